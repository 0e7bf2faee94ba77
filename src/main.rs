use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use image_normalizer::{
    Config,
    batch::{BatchCoordinator, BatchResponse, QueueEvent},
    processing::ItemProcessor,
    storage,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    // The log sink stamps each line, so no timestamps or colours here
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = storage::create_store(&config.storage()).await;
    info!(
        "Writing {}x{} images to {} via {}",
        config.image_width,
        config.image_height,
        config.processed_bucket,
        store.name()
    );

    let coordinator = BatchCoordinator::new(ItemProcessor::from_config(store, &config));
    let coordinator = &coordinator;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<QueueEvent>| async move {
        Ok::<BatchResponse, Error>(coordinator.handle_event(event.payload).await)
    }))
    .await
}
