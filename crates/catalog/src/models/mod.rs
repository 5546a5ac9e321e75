mod condition;
mod edition;

pub use self::condition::Condition;
pub use self::edition::Edition;
