mod support;

use phonebook_core::{
    Contact, ContactId, ContactListController, ContactListError, ContactValidationError,
    GatewayError,
};
use std::sync::Arc;
use std::time::Duration;
use support::{sample_contacts, FakeContactApi};

async fn loaded_controller(api: &Arc<FakeContactApi>) -> ContactListController {
    let controller = ContactListController::new(api.clone());
    controller.refresh().await.unwrap();
    controller
}

fn names(contacts: &[Contact]) -> Vec<&str> {
    contacts.iter().map(|contact| contact.name.as_str()).collect()
}

#[tokio::test]
async fn refresh_replaces_collection_with_server_list() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = ContactListController::new(api.clone());
    assert!(controller.is_empty());

    let count = controller.refresh().await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(controller.contacts(), sample_contacts());

    api.insert_remote(Contact::new("9", "Zed", "555-9999"));
    controller.refresh().await.unwrap();
    assert_eq!(controller.contacts(), api.server_contacts());
}

#[tokio::test]
async fn refresh_failure_keeps_prior_collection_and_sets_error() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;

    api.fail_next(GatewayError::Network("connection refused".to_string()));
    let err = controller.refresh().await.unwrap_err();

    assert_eq!(
        err,
        ContactListError::Gateway(GatewayError::Network("connection refused".to_string()))
    );
    assert_eq!(controller.contacts(), sample_contacts());
    assert!(controller
        .error_message()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn filtered_view_with_empty_term_returns_full_collection_in_order() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;

    let view = controller.filtered_view("");
    assert_eq!(view.to_vec(), sample_contacts());
}

#[tokio::test]
async fn filtered_view_matches_name_or_phone_case_insensitively() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;

    assert_eq!(names(&controller.filtered_view("555-22").to_vec()), ["Bob"]);
    assert_eq!(names(&controller.filtered_view("ann").to_vec()), ["Ann Lee"]);
    assert_eq!(names(&controller.filtered_view("LEE").to_vec()), ["Ann Lee"]);
    assert_eq!(
        names(&controller.filtered_view("555").to_vec()),
        ["Ann Lee", "Bob"]
    );
    assert!(controller.filtered_view("carol").to_vec().is_empty());
}

#[tokio::test]
async fn filtered_view_is_restartable_and_detached_from_later_writes() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;

    let view = controller.filtered_view("b");
    let first: Vec<_> = view.iter().map(|contact| contact.id.clone()).collect();
    let second: Vec<_> = (&view)
        .into_iter()
        .map(|contact| contact.id.clone())
        .collect();
    assert_eq!(first, second);

    controller.add("Barbara", "555-3333").await.unwrap();
    assert_eq!(view.iter().count(), 1);
    assert_eq!(controller.filtered_view("b").iter().count(), 2);
}

#[tokio::test]
async fn add_with_blank_field_never_calls_gateway() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;
    let calls_before = api.calls();

    let err = controller.add("", "123").await.unwrap_err();

    assert_eq!(
        err,
        ContactListError::Validation(ContactValidationError::EmptyName)
    );
    assert_eq!(api.calls(), calls_before);
    assert_eq!(controller.contacts(), sample_contacts());
    assert_eq!(
        controller.error_message().as_deref(),
        Some("name must not be empty")
    );

    let err = controller.add("Carol", "  ").await.unwrap_err();
    assert_eq!(
        err,
        ContactListError::Validation(ContactValidationError::EmptyPhone)
    );
    assert_eq!(api.calls(), calls_before);
}

#[tokio::test]
async fn add_appends_server_confirmed_contact() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;

    let created = controller.add("  Carol ", "555-3333").await.unwrap();

    assert_eq!(created.name, "Carol");
    assert_eq!(controller.len(), 3);
    assert_eq!(controller.contacts().last(), Some(&created));
    assert!(controller.error_message().is_none());
}

#[tokio::test]
async fn failed_add_leaves_collection_untouched() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;

    api.fail_next(GatewayError::Validation("phone is required".to_string()));
    let err = controller.add("Carol", "555-3333").await.unwrap_err();

    assert!(matches!(
        err,
        ContactListError::Gateway(GatewayError::Validation(_))
    ));
    assert_eq!(controller.contacts(), sample_contacts());
}

#[tokio::test]
async fn update_replaces_matching_entry_in_place() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;
    let id = ContactId::new("1");

    let updated = controller.update(&id, "Ann Smith", "555-0000").await.unwrap();

    assert_eq!(updated, Contact::new("1", "Ann Smith", "555-0000"));
    assert_eq!(controller.contacts()[0], updated);
    assert_eq!(controller.len(), 2);
}

#[tokio::test]
async fn failed_update_keeps_pre_update_values() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;
    let id = ContactId::new("2");

    api.fail_next(GatewayError::NotFound(id.clone()));
    let err = controller.update(&id, "Robert", "555-0000").await.unwrap_err();

    assert_eq!(
        err,
        ContactListError::Gateway(GatewayError::NotFound(id.clone()))
    );
    assert_eq!(controller.get(&id), Some(Contact::new("2", "Bob", "555-2222")));

    let err = controller.update(&id, "", "555-0000").await.unwrap_err();
    assert!(matches!(err, ContactListError::Validation(_)));
    assert_eq!(controller.get(&id), Some(Contact::new("2", "Bob", "555-2222")));
}

#[tokio::test]
async fn remove_drops_exactly_one_entry() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;
    let id = ContactId::new("1");

    controller.remove(&id).await.unwrap();

    assert_eq!(controller.len(), 1);
    assert!(controller.get(&id).is_none());
    assert_eq!(controller.contacts()[0].name, "Bob");
}

#[tokio::test]
async fn failed_remove_leaves_collection_untouched() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;

    let err = controller.remove(&ContactId::new("404")).await.unwrap_err();

    assert!(matches!(
        err,
        ContactListError::Gateway(GatewayError::NotFound(_))
    ));
    assert_eq!(controller.contacts(), sample_contacts());
}

#[tokio::test]
async fn successful_mutations_then_refresh_match_server() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;

    let carol = controller.add("Carol", "555-3333").await.unwrap();
    controller
        .update(&ContactId::new("2"), "Bobby", "555-2223")
        .await
        .unwrap();
    controller.remove(&ContactId::new("1")).await.unwrap();
    controller.update(&carol.id, "Caroline", "555-3334").await.unwrap();

    let patched = controller.contacts();
    controller.refresh().await.unwrap();

    assert_eq!(controller.contacts(), api.server_contacts());
    assert_eq!(patched, controller.contacts());
}

#[tokio::test]
async fn concurrent_adds_both_land_regardless_of_arrival_order() {
    let api = Arc::new(FakeContactApi::new());
    let controller = ContactListController::new(api.clone());
    api.delay_create("A", Duration::from_millis(50));

    let (first, second) = tokio::join!(controller.add("A", "1"), controller.add("B", "2"));
    let first = first.unwrap();
    let second = second.unwrap();

    assert_eq!(controller.len(), 2);
    assert!(controller.get(&first.id).is_some());
    assert!(controller.get(&second.id).is_some());
    // "B" was confirmed first, so it was appended first.
    assert_eq!(names(&controller.contacts()), ["B", "A"]);
}

#[tokio::test]
async fn new_attempt_clears_previous_error() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = loaded_controller(&api).await;

    api.fail_next(GatewayError::Auth);
    controller.refresh().await.unwrap_err();
    assert!(controller.error_message().is_some());

    controller.refresh().await.unwrap();
    assert!(controller.error_message().is_none());

    controller.add("", "").await.unwrap_err();
    assert_eq!(
        controller.error_message().as_deref(),
        Some("name must not be empty")
    );
}

#[tokio::test]
async fn results_arriving_after_reset_are_discarded() {
    let api = Arc::new(FakeContactApi::with_contacts(sample_contacts()));
    let controller = ContactListController::new(api.clone());
    api.delay_list(Duration::from_millis(50));

    let (result, ()) = tokio::join!(controller.refresh(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.reset();
    });

    assert_eq!(result, Err(ContactListError::Superseded));
    assert!(controller.is_empty());
    assert!(controller.error_message().is_none());
}
