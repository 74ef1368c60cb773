use paysession::domain::customer::Customer;
use paysession::domain::ports::{
    CustomerAccessor, CustomerAccessorRef, SessionPreferences, SessionPreferencesBox,
    SessionStateStore, SessionStateStoreBox,
};
use paysession::domain::session_data::SessionData;
use paysession::infrastructure::in_memory::{
    InMemoryCustomerAccessor, InMemorySessionPreferences, InMemorySessionStateStore,
};
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let preferences: SessionPreferencesBox = Box::new(InMemorySessionPreferences::new());
    let state_store: SessionStateStoreBox = Box::new(InMemorySessionStateStore::new());
    let accessor: CustomerAccessorRef =
        Arc::new(InMemoryCustomerAccessor::new(Customer::new("cus_1")));

    // Verify Send + Sync by spawning tasks
    let prefs_handle = tokio::spawn(async move {
        preferences
            .save_selected_payment_method_id("cus_1", "pm_1")
            .await
            .unwrap();
        preferences.selected_payment_method_id("cus_1").await.unwrap()
    });

    let state_handle = tokio::spawn(async move {
        let mut data = SessionData::new();
        data.set_cart_total(700, &Default::default());
        state_store.save("cus_1", &data).await.unwrap();
        state_store.load("cus_1").await.unwrap().unwrap()
    });

    let fetch_accessor = Arc::clone(&accessor);
    let customer_handle =
        tokio::spawn(async move { fetch_accessor.fetch_current_customer().await.unwrap() });

    assert_eq!(prefs_handle.await.unwrap().as_deref(), Some("pm_1"));
    assert_eq!(state_handle.await.unwrap().cart_total(), 700);
    assert_eq!(customer_handle.await.unwrap().id.as_deref(), Some("cus_1"));
    assert!(accessor.cached_customer().await.is_some());
}
