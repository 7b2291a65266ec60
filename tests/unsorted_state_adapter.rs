mod common;

use common::*;
use entity_store::entity::{EntityState, StateOperations, Update};

fn empty() -> EntityState<String, Book> {
    unsorted_adapter().get_initial_state()
}

#[test]
fn add_one_appends() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());

    assert_eq!(ids(&state), ["tgg"]);
    assert_eq!(state.get(&key("tgg")), Some(&the_great_gatsby()));
}

/// Adding a key that is already present returns the very same state.
#[test]
fn add_one_is_idempotent() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());
    let before = state.clone();

    let state = adapter.add_one(book("tgg", "Something Else"), state);
    assert!(state.ptr_eq(&before));
    assert_eq!(state.get(&key("tgg")).unwrap().title, "The Great Gatsby");
}

#[test]
fn add_many_keeps_input_order() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(animal_farm(), empty());
    let state = adapter.add_many(vec![the_great_gatsby(), a_clockwork_orange()], state);

    assert_eq!(ids(&state), ["af", "tgg", "aco"]);
}

#[test]
fn add_many_with_only_present_keys_is_a_no_op() {
    let adapter = unsorted_adapter();
    let state = adapter.add_many(vec![the_great_gatsby(), animal_farm()], empty());
    let before = state.clone();

    let state = adapter.add_many(vec![animal_farm(), the_great_gatsby()], state);
    assert!(state.ptr_eq(&before));
}

#[test]
fn add_all_replaces_the_collection() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());
    let state = adapter.add_all(vec![a_clockwork_orange(), animal_farm()], state);

    assert_eq!(ids(&state), ["aco", "af"]);
    assert!(!state.contains(&key("tgg")));
}

#[test]
fn set_all_is_add_all() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());
    let state = adapter.set_all(vec![animal_farm()], state);

    assert_eq!(ids(&state), ["af"]);
}

#[test]
fn set_one_inserts_absent_entity() {
    let adapter = unsorted_adapter();
    let state = adapter.set_one(the_great_gatsby(), empty());
    assert_eq!(ids(&state), ["tgg"]);
}

/// Replacing an entity in place shares the ids sequence.
#[test]
fn set_one_replaces_present_entity() {
    let adapter = unsorted_adapter();
    let state = adapter.add_many(vec![the_great_gatsby(), animal_farm()], empty());
    let before = state.clone();

    let state = adapter.set_one(book("tgg", "Gatsby"), state);
    assert_eq!(state.get(&key("tgg")).unwrap().title, "Gatsby");
    assert!(state.ids_ptr_eq(&before));
    assert!(!state.ptr_eq(&before));
}

#[test]
fn set_one_with_equal_entity_is_a_no_op() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());
    let before = state.clone();

    let state = adapter.set_one(the_great_gatsby(), state);
    assert!(state.ptr_eq(&before));
}

#[test]
fn set_many_mixes_replace_and_insert() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());
    let state = adapter.set_many(vec![book("tgg", "Gatsby"), animal_farm()], state);

    assert_eq!(ids(&state), ["tgg", "af"]);
    assert_eq!(titles(&state), ["Gatsby", "Animal Farm"]);
}

#[test]
fn remove_one() {
    let adapter = unsorted_adapter();
    let state = adapter.add_many(vec![the_great_gatsby(), animal_farm()], empty());
    let state = adapter.remove_one(&key("tgg"), state);

    assert_eq!(ids(&state), ["af"]);
    assert!(!state.contains(&key("tgg")));
}

#[test]
fn remove_one_absent_is_a_no_op() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());
    let before = state.clone();

    let state = adapter.remove_one(&key("missing"), state);
    assert!(state.ptr_eq(&before));
}

#[test]
fn remove_many_ignores_absent_keys() {
    let adapter = unsorted_adapter();
    let state = adapter.add_many(
        vec![the_great_gatsby(), animal_farm(), a_clockwork_orange()],
        empty(),
    );
    let state = adapter.remove_many(&[key("tgg"), key("missing"), key("aco")], state);

    assert_eq!(ids(&state), ["af"]);
    assert_eq!(state.len(), 1);
}

/// `remove_all` hands back a new empty state even when given an empty one.
#[test]
fn remove_all_returns_fresh_state() {
    let adapter = unsorted_adapter();
    let state = adapter.add_many(vec![the_great_gatsby(), animal_farm()], empty());
    let state = adapter.remove_all(state);
    assert!(state.is_empty());

    let before = state.clone();
    let state = adapter.remove_all(state);
    assert!(state.is_empty());
    assert!(!state.ptr_eq(&before));
    assert!(!state.ptr_eq(&EntityState::new()));
}

#[test]
fn update_one_patches_and_shares_ids() {
    let adapter = unsorted_adapter();
    let state = adapter.add_many(vec![the_great_gatsby(), animal_farm()], empty());
    let before = state.clone();

    let state = adapter.update_one(Update::new(key("tgg"), title("A New Hope")), state);

    assert_eq!(state.get(&key("tgg")), Some(&book("tgg", "A New Hope")));
    assert!(state.ids_ptr_eq(&before));
}

#[test]
fn update_one_absent_is_a_no_op() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());
    let before = state.clone();

    let state = adapter.update_one(Update::new(key("missing"), title("Nope")), state);
    assert!(state.ptr_eq(&before));
}

#[test]
fn update_one_without_effect_is_a_no_op() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());
    let before = state.clone();

    let state = adapter.update_one(Update::new(key("tgg"), title("The Great Gatsby")), state);
    assert!(state.ptr_eq(&before));
}

/// An id-changing update keeps the entity's slot.
#[test]
fn update_one_id_change_keeps_position() {
    let adapter = unsorted_adapter();
    let state = adapter.add_all(
        vec![the_great_gatsby(), a_clockwork_orange(), animal_farm()],
        empty(),
    );

    let state = adapter.update_one(Update::new(key("tgg"), idx("new-id")), state);

    assert_eq!(ids(&state), ["new-id", "aco", "af"]);
    assert!(!state.contains(&key("tgg")));
    assert_eq!(state.get(&key("new-id")).unwrap().title, "The Great Gatsby");
}

#[test]
fn update_one_id_collision_overwrites_other_entity() {
    let adapter = unsorted_adapter();
    let state = adapter.add_all(
        vec![the_great_gatsby(), a_clockwork_orange(), animal_farm()],
        empty(),
    );

    let state = adapter.update_one(Update::new(key("tgg"), idx("af")), state);

    assert_eq!(ids(&state), ["af", "aco"]);
    assert_eq!(state.get(&key("af")), Some(&book("af", "The Great Gatsby")));
    adapter.check(&state).unwrap();
}

#[test]
fn update_many_sees_earlier_updates() {
    let adapter = unsorted_adapter();
    let state = adapter.add_many(vec![the_great_gatsby(), animal_farm()], empty());

    let state = adapter.update_many(
        vec![
            Update::new(key("tgg"), idx("gatsby")),
            Update::new(key("gatsby"), title("Gatsby")),
            Update::new(key("tgg"), title("Lost")),
        ],
        state,
    );

    assert_eq!(ids(&state), ["gatsby", "af"]);
    assert_eq!(titles(&state), ["Gatsby", "Animal Farm"]);
}

#[test]
fn upsert_one_inserts_absent_entity() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());

    let state = adapter.upsert_one(Update::new(key("af"), animal_farm()), state);
    assert_eq!(ids(&state), ["tgg", "af"]);
}

#[test]
fn upsert_one_patches_present_entity() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());

    let state = adapter.upsert_one(Update::new(key("tgg"), title("Gatsby")), state);
    assert_eq!(state.get(&key("tgg")), Some(&book("tgg", "Gatsby")));
}

/// A partial patch for an absent key cannot become an entity.
#[test]
fn upsert_one_partial_changes_for_absent_key_is_a_no_op() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());
    let before = state.clone();

    let state = adapter.upsert_one(Update::new(key("af"), title("Animal Farm")), state);
    assert!(state.ptr_eq(&before));
}

#[test]
fn upsert_many_mixes_update_and_insert() {
    let adapter = unsorted_adapter();
    let state = adapter.add_one(the_great_gatsby(), empty());

    let state = adapter.upsert_many(
        vec![
            Update::new(key("tgg"), title("Gatsby")),
            Update::new(key("af"), idx_and_title("af", "Animal Farm")),
            Update::new(key("af"), title("Animal Farm II")),
        ],
        state,
    );

    assert_eq!(ids(&state), ["tgg", "af"]);
    assert_eq!(titles(&state), ["Gatsby", "Animal Farm II"]);
}

#[test]
fn selectors() {
    let adapter = unsorted_adapter();
    let state = adapter.initial_state_with(vec![the_great_gatsby(), animal_farm()]);

    assert_eq!(adapter.select_ids(&state), [key("tgg"), key("af")]);
    assert_eq!(adapter.select_total(&state), 2);
    assert_eq!(adapter.select_all(&state), [&the_great_gatsby(), &animal_farm()]);
    assert_eq!(adapter.select_entities(&state).get(&key("af")), Some(&animal_farm()));
}
