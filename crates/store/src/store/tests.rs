use super::*;
use crate::SharedStore;
use proptest::prelude::*;
use rstest::rstest;

/// Both flavours must behave identically, so most tests run against each.
#[derive(Debug, Clone, Copy)]
enum Flavour {
    Plain,
    Shared,
}

fn make_library(flavour: Flavour) -> Box<dyn Library> {
    let store = Store::new().with_verification(Verification::Always);
    match flavour {
        Flavour::Plain => Box::new(store),
        Flavour::Shared => Box::new(SharedStore::new(store)),
    }
}

fn edition(title: &str, authors: &[&str], year: i32) -> Edition {
    Edition::new(title, authors.iter().copied(), year).unwrap()
}

fn what() -> Edition {
    edition("What", &["Arthur"], 2009)
}

fn titles(found: &[Arc<Edition>]) -> Vec<(String, u32)> {
    found.iter().map(|e| (e.title().to_string(), e.year())).collect()
}

// =========================================================================
// acquire
// =========================================================================

#[rstest]
fn test_acquire_new_copy(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let book = what();
    let copy = library.acquire(&book);
    assert!(library.is_available(copy));
    assert_eq!(library.all_copies(&book), HashSet::from([copy]));
    assert_eq!(library.available_copies(&book), HashSet::from([copy]));
}

#[rstest]
fn test_acquire_repeatedly(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour, #[values(2, 5)] n: usize) {
    let mut library = make_library(flavour);
    let book = what();
    let copies: HashSet<_> = (0..n).map(|_| library.acquire(&book)).collect();
    assert_eq!(copies.len(), n, "every copy gets its own handle");
    assert_eq!(library.all_copies(&book).len(), n);
    assert_eq!(library.available_copies(&book).len(), n);
    assert_eq!(library.find("What").len(), 1);
}

#[test]
fn test_acquire_equal_editions_share_holding() {
    let mut store = Store::new();
    store.acquire(&what());
    store.acquire(&what());
    assert_eq!(store.stats().editions, 1);
    assert_eq!(store.condition(store.all_copies(&what()).into_iter().next().unwrap()).unwrap(), Condition::Good);
}

// =========================================================================
// checkout / checkin
// =========================================================================

#[rstest]
fn test_checkout_and_checkin_round_trip(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let book = what();
    let copy = library.acquire(&book);

    library.checkout(copy).unwrap();
    assert!(!library.is_available(copy));
    assert_eq!(library.all_copies(&book).len(), 1);
    assert!(library.available_copies(&book).is_empty());

    library.checkin(copy, Condition::Good).unwrap();
    assert!(library.is_available(copy));
    assert_eq!(library.available_copies(&book), HashSet::from([copy]));
}

#[rstest]
fn test_checkout_one_of_many(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let book = what();
    let first = library.acquire(&book);
    let second = library.acquire(&book);

    library.checkout(first).unwrap();
    assert_eq!(library.all_copies(&book).len(), 2);
    assert_eq!(library.available_copies(&book), HashSet::from([second]));

    library.checkout(second).unwrap();
    assert_eq!(library.all_copies(&book).len(), 2);
    assert!(library.available_copies(&book).is_empty());
}

#[rstest]
fn test_checkout_twice_fails_without_side_effects(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let book = what();
    let copy = library.acquire(&book);
    let other = library.acquire(&book);
    library.checkout(copy).unwrap();

    let err = library.checkout(copy).unwrap_err();
    assert_eq!(*err, ErrorKind::NotAvailable(copy));
    assert_eq!(library.all_copies(&book).len(), 2);
    assert_eq!(library.available_copies(&book), HashSet::from([other]));
}

#[rstest]
fn test_checkin_of_available_copy_fails(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let copy = library.acquire(&what());
    let err = library.checkin(copy, Condition::Damaged).unwrap_err();
    assert_eq!(*err, ErrorKind::NotCheckedOut(copy));
    assert!(library.is_available(copy));
}

#[test]
fn test_checkin_records_condition() {
    let mut store = Store::new();
    let copy = store.acquire(&what());
    store.checkout(copy).unwrap();
    store.checkin(copy, Condition::Damaged).unwrap();
    assert_eq!(store.condition(copy).unwrap(), Condition::Damaged);
    let status = store.status(copy).unwrap();
    assert!(status.available);
    assert_eq!(*status.edition, what());
}

#[test]
fn test_failed_checkin_keeps_condition() {
    let mut store = Store::new();
    let copy = store.acquire(&what());
    assert!(store.checkin(copy, Condition::Damaged).is_err());
    assert_eq!(store.condition(copy).unwrap(), Condition::Good);
}

// =========================================================================
// find
// =========================================================================

#[rstest]
fn test_find_orders_newest_first_on_title_tie(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    library.acquire(&edition("What", &["Arthur"], 2009));
    library.acquire(&edition("What", &["Arthur"], 2015));
    let found = library.find("What");
    assert_eq!(titles(&found), vec![("What".to_string(), 2015), ("What".to_string(), 2009)]);
}

#[rstest]
#[case("what")]
#[case("WHAT")]
#[case("arthur")]
#[case("Wha")]
#[case("")]
fn test_find_is_exact_and_case_sensitive(#[case] query: &str) {
    let mut store = Store::new();
    store.acquire(&what());
    assert!(store.find(query).is_empty());
}

#[rstest]
fn test_find_by_any_author_position(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let book = edition("Together", &["Arthur", "Bea", "Cy"], 2001);
    library.acquire(&book);
    for author in ["Arthur", "Bea", "Cy"] {
        assert_eq!(library.find(author), vec![Arc::new(book.clone())]);
    }
}

#[test]
fn test_find_merges_title_and_author_matches_without_duplicates() {
    let mut store = Store::new();
    let memoir = edition("Arthur", &["Arthur"], 2020);
    let novel = edition("What", &["Arthur"], 2009);
    let unrelated = edition("Else", &["Zoe"], 2001);
    store.acquire(&memoir);
    store.acquire(&memoir);
    store.acquire(&novel);
    let copy = store.acquire(&unrelated);
    store.checkout(copy).unwrap();

    let found = store.find("Arthur");
    assert_eq!(found, vec![Arc::new(memoir), Arc::new(novel)]);
    assert_eq!(store.find("Zoe"), vec![Arc::new(unrelated)], "checked-out copies still count");
}

// =========================================================================
// lose / dispose
// =========================================================================

#[rstest]
fn test_scenario_lose_checked_out_copy(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let book = what();
    let first = library.acquire(&book);
    let second = library.acquire(&book);
    assert_eq!(library.all_copies(&book).len(), 2);
    assert_eq!(library.available_copies(&book).len(), 2);

    library.checkout(first).unwrap();
    assert_eq!(library.available_copies(&book).len(), 1);
    assert_eq!(library.all_copies(&book).len(), 2);

    library.lose(first).unwrap();
    assert_eq!(library.all_copies(&book), HashSet::from([second]));
    assert!(!library.is_available(first));
}

#[rstest]
fn test_lose_last_copy_unindexes_edition(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let book = what();
    let copy = library.acquire(&book);
    library.lose(copy).unwrap();
    assert!(library.find("What").is_empty());
    assert!(library.find("Arthur").is_empty());
    assert!(library.all_copies(&book).is_empty());
    assert!(library.available_copies(&book).is_empty());
}

#[test]
fn test_lose_last_copy_clears_index() {
    let mut store = Store::new();
    let book = what();
    let copy = store.acquire(&book);
    store.lose(copy).unwrap();
    assert!(!store.index.mentions(&book));
    assert_eq!(store.stats(), Stats::default());
}

#[rstest]
fn test_lose_unknown_copy_fails(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let copy = library.acquire(&what());
    library.lose(copy).unwrap();
    let err = library.lose(copy).unwrap_err();
    assert_eq!(*err, ErrorKind::UnknownCopy(copy));
}

#[rstest]
fn test_lost_copy_cannot_be_lent(#[values(Flavour::Plain, Flavour::Shared)] flavour: Flavour) {
    let mut library = make_library(flavour);
    let copy = library.acquire(&what());
    library.lose(copy).unwrap();
    assert_eq!(*library.checkout(copy).unwrap_err(), ErrorKind::NotAvailable(copy));
    assert_eq!(*library.checkin(copy, Condition::Good).unwrap_err(), ErrorKind::NotCheckedOut(copy));
}

#[test]
fn test_handles_from_another_store_are_unknown() {
    let mut store = Store::new();
    let mut other = Store::new();
    other.acquire(&what());
    let foreign = other.acquire(&what());
    store.acquire(&what());
    assert_eq!(*store.lose(foreign).unwrap_err(), ErrorKind::UnknownCopy(foreign));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_stale_handle_after_slot_reuse() {
    let mut store = Store::new();
    let old = store.acquire(&what());
    store.lose(old).unwrap();
    let new = store.acquire(&edition("Other", &["Bea"], 1999));
    assert_ne!(old, new);
    assert!(!store.is_available(old));
    assert_eq!(*store.edition(old).unwrap_err(), ErrorKind::UnknownCopy(old));
    assert_eq!(store.edition(new).unwrap().title(), "Other");
}

#[test]
fn test_dispose_available_copy() {
    let mut store = Store::new();
    let copy = store.acquire(&what());
    store.inspect(copy, Condition::Damaged).unwrap();
    store.dispose(copy).unwrap();
    assert!(store.is_empty());
    assert!(store.find("What").is_empty());
    assert_eq!(*store.dispose(copy).unwrap_err(), ErrorKind::UnknownCopy(copy));
}

#[test]
fn test_dispose_checked_out_copy_fails() {
    let mut store = Store::new();
    let copy = store.acquire(&what());
    store.checkout(copy).unwrap();
    assert_eq!(*store.dispose(copy).unwrap_err(), ErrorKind::NotAvailable(copy));
    assert_eq!(store.all_copies(&what()), HashSet::from([copy]));
}

#[test]
fn test_inspect_unknown_copy_fails() {
    let mut store = Store::new();
    let copy = store.acquire(&what());
    store.lose(copy).unwrap();
    assert_eq!(*store.inspect(copy, Condition::Good).unwrap_err(), ErrorKind::UnknownCopy(copy));
}

#[test]
fn test_stats() {
    let mut store = Store::with_capacity(8);
    let copy = store.acquire(&edition("What", &["Arthur", "Bea"], 2009));
    store.acquire(&edition("Other", &["Bea"], 1999));
    store.checkout(copy).unwrap();
    assert_eq!(
        store.stats(),
        Stats { copies: 2, available: 1, checked_out: 1, editions: 2, titles: 2, authors: 2 }
    );
    assert_eq!(
        store.stats().to_string(),
        "2 copies (1 available, 1 checked out) of 2 editions; 2 titles, 2 authors indexed"
    );
}

#[test]
fn test_editions_lists_live_editions_once() {
    let mut store = Store::new();
    store.acquire(&what());
    store.acquire(&what());
    let other = store.acquire(&edition("Other", &["Bea"], 1999));
    let mut listed: Vec<_> = store.editions().map(|e| e.title().to_string()).collect();
    listed.sort();
    assert_eq!(listed, vec!["Other", "What"]);

    store.lose(other).unwrap();
    assert_eq!(store.editions().count(), 1);
}

// =========================================================================
// Random operation sequences against a scan-based model
// =========================================================================

const QUERIES: [&str; 7] = ["What", "Arthur", "Bea", "Zoe", "Other", "what", "Nobody"];

fn catalogue() -> Vec<Edition> {
    vec![
        edition("What", &["Arthur"], 2009),
        edition("What", &["Arthur"], 2015),
        edition("What", &["Bea", "Arthur"], 2015),
        edition("Other", &["Bea"], 1999),
        edition("Arthur", &["Zoe"], 2020),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Acquire(usize),
    Checkout(usize),
    Checkin(usize, bool),
    Lose(usize),
    Dispose(usize),
    Inspect(usize, bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..5usize).prop_map(Op::Acquire),
        3 => any::<usize>().prop_map(Op::Checkout),
        2 => (any::<usize>(), any::<bool>()).prop_map(|(c, d)| Op::Checkin(c, d)),
        1 => any::<usize>().prop_map(Op::Lose),
        1 => any::<usize>().prop_map(Op::Dispose),
        1 => (any::<usize>(), any::<bool>()).prop_map(|(c, d)| Op::Inspect(c, d)),
    ]
}

/// Naive model: every handle ever issued, with its edition and (while live)
/// whether it is available.
#[derive(Debug, Default)]
struct Model {
    copies: Vec<(CopyId, usize, Option<bool>, Condition)>,
}

impl Model {
    fn pick(&self, n: usize) -> Option<usize> {
        match self.copies.is_empty() {
            true => None,
            false => Some(n % self.copies.len()),
        }
    }
}

fn condition(damaged: bool) -> Condition {
    match damaged {
        true => Condition::Damaged,
        false => Condition::Good,
    }
}

proptest! {
    #[test]
    fn prop_store_agrees_with_scan_model(ops in proptest::collection::vec(op(), 1..80)) {
        let editions = catalogue();
        let mut store = Store::new().with_verification(Verification::Always);
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Acquire(e) => {
                    let copy = store.acquire(&editions[e]);
                    model.copies.push((copy, e, Some(true), Condition::Good));
                },
                Op::Checkout(n) => {
                    let Some(i) = model.pick(n) else { continue };
                    let (copy, _, state, _) = &mut model.copies[i];
                    let result = store.checkout(*copy);
                    prop_assert_eq!(result.is_ok(), *state == Some(true));
                    if result.is_ok() {
                        *state = Some(false);
                    }
                },
                Op::Checkin(n, damaged) => {
                    let Some(i) = model.pick(n) else { continue };
                    let (copy, _, state, recorded) = &mut model.copies[i];
                    let result = store.checkin(*copy, condition(damaged));
                    prop_assert_eq!(result.is_ok(), *state == Some(false));
                    if result.is_ok() {
                        *state = Some(true);
                        *recorded = condition(damaged);
                    }
                },
                Op::Lose(n) => {
                    let Some(i) = model.pick(n) else { continue };
                    let (copy, _, state, _) = &mut model.copies[i];
                    let result = store.lose(*copy);
                    prop_assert_eq!(result.is_ok(), state.is_some());
                    *state = None;
                },
                Op::Dispose(n) => {
                    let Some(i) = model.pick(n) else { continue };
                    let (copy, _, state, _) = &mut model.copies[i];
                    let result = store.dispose(*copy);
                    prop_assert_eq!(result.is_ok(), *state == Some(true));
                    if result.is_ok() {
                        *state = None;
                    }
                },
                Op::Inspect(n, damaged) => {
                    let Some(i) = model.pick(n) else { continue };
                    let (copy, _, state, recorded) = &mut model.copies[i];
                    let result = store.inspect(*copy, condition(damaged));
                    prop_assert_eq!(result.is_ok(), state.is_some());
                    if result.is_ok() {
                        *recorded = condition(damaged);
                    }
                },
            }

            prop_assert!(store.check_invariants().is_ok());
            prop_assert!(store.available.is_disjoint(&store.checked_out));

            for (e, book) in editions.iter().enumerate() {
                let live = model.copies.iter().filter(|(_, of, state, _)| *of == e && state.is_some());
                let all: HashSet<_> = live.clone().map(|(copy, ..)| *copy).collect();
                let available: HashSet<_> = live.filter(|(.., state, _)| *state == Some(true)).map(|(copy, ..)| *copy).collect();
                prop_assert_eq!(&store.all_copies(book), &all);
                prop_assert_eq!(&store.available_copies(book), &available);
                prop_assert_eq!(store.index.mentions(book), !all.is_empty());
            }

            for query in QUERIES {
                let mut expected: Vec<&Edition> = editions
                    .iter()
                    .enumerate()
                    .filter(|(e, book)| {
                        book.matches(query) && model.copies.iter().any(|(_, of, state, _)| of == e && state.is_some())
                    })
                    .map(|(_, book)| book)
                    .collect();
                expected.sort();
                let found = store.find(query);
                prop_assert_eq!(found.iter().map(|e| &**e).collect::<Vec<_>>(), expected);
            }

            for (copy, _, state, recorded) in &model.copies {
                prop_assert_eq!(store.is_available(*copy), *state == Some(true));
                if state.is_some() {
                    prop_assert_eq!(store.condition(*copy).unwrap(), *recorded);
                }
            }
        }
    }
}
