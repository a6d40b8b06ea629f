//! The process-wide provider. Kept in its own test binary because it mutates
//! global state.

use std::sync::Arc;

use portana_api::services::PriceServiceTrait;
use portana_api::{
    global_provider, install_global_provider, shared_client, ApiError, ClientProvider,
    PortanaServices, StaticConfig,
};

#[tokio::test]
async fn installed_global_provider_is_shared() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/prices")
        .match_header("authorization", mockito::Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"prices": []}"#)
        .expect(1)
        .create_async()
        .await;

    let provider = Arc::new(ClientProvider::new(Arc::new(StaticConfig::new(server.url()))));
    install_global_provider(provider.clone()).unwrap();

    let second = Arc::new(ClientProvider::new(Arc::new(StaticConfig::empty())));
    assert!(matches!(
        install_global_provider(second),
        Err(ApiError::Config(_))
    ));

    assert!(Arc::ptr_eq(&global_provider(), &provider));
    let shared = shared_client().await.unwrap();
    assert!(Arc::ptr_eq(&shared, &provider.client().await.unwrap()));

    let prices = PortanaServices::global().prices.get_prices().await.unwrap();
    assert!(prices.is_empty());
    mock.assert_async().await;
}
