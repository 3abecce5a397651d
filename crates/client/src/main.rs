use anyhow::Context;
use client::config::Settings;
use client::{DetailController, OpinionsController, SentinelEvent, Viewer};
use domain::{Comment, DiscussionId, FeedEvent, ForwardState, ListContext, ViewKind};
use dotenvy::dotenv;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::new().context("Failed to load configuration")?;
    let api = adapter::connect(settings.backend_config()).context("Failed to build forum backend")?;
    let discussion_id = DiscussionId::new(settings.demo.discussion_id)
        .map_err(anyhow::Error::msg)
        .context("Invalid demo.discussion_id")?;
    let viewer = settings
        .demo
        .viewer
        .clone()
        .map(Viewer::named)
        .unwrap_or_default();

    let (tx_events, _rx_events) = broadcast::channel(256);

    // --- detail screen: metadata + best comments ---
    let mut detail = DetailController::new(
        api.clone(),
        viewer.clone(),
        ForwardState::new(discussion_id, ListContext::default()),
        tx_events.clone(),
    );
    detail
        .mount()
        .await
        .with_context(|| format!("Failed to open discussion {}", discussion_id))?;

    let Some(discussion) = detail.discussion() else {
        anyhow::bail!("Discussion {} did not load", discussion_id);
    };
    println!("# {} ({:?})", discussion.title, discussion.status);
    if detail.is_hidden() {
        println!("This discussion was blocked by an administrator.");
        return Ok(());
    }
    println!("\nBEST opinions ({} total comments)", discussion.comment_count);
    for c in detail.best_comments().items {
        print_comment(&c);
    }

    let nav = detail.open_full_view();
    detail.unmount();
    info!("Navigating to {}", nav.route.path());

    // --- full list: paginate by reporting the sentinel as visible ---
    let mut opinions = OpinionsController::new(api, viewer, nav.state, tx_events.clone());
    opinions
        .mount()
        .await
        .context("Failed to load the first page of opinions")?;

    let (tx_sentinel, rx_sentinel) = mpsc::channel(16);
    let loader = opinions.loader();
    let probe = loader.clone();
    let loader_task = tokio::spawn(loader.run(rx_sentinel));
    let mut feed_events = BroadcastStream::new(tx_events.subscribe());

    let scroll = async {
        while probe.is_attached() {
            if tx_sentinel.send(SentinelEvent::Visible).await.is_err() {
                break;
            }
            while let Some(event) = feed_events.next().await {
                match event {
                    Ok(FeedEvent::PageApplied {
                        view: ViewKind::Full,
                        ..
                    }) => break,
                    Ok(FeedEvent::LoadFailed {
                        view: ViewKind::Full,
                        error,
                        ..
                    }) => return Err(anyhow::Error::new(error)),
                    Ok(_) => {}
                    Err(e) => warn!("Event stream lagged: {}", e),
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    };

    tokio::select! {
        res = scroll => res.context("Failed while paging through opinions")?,
        _ = shutdown_signal() => info!("Stopped paging early"),
    }
    drop(tx_sentinel);
    let pages = loader_task.await.unwrap_or_default();

    let snapshot = opinions.snapshot();
    println!(
        "\nOpinions ({}) loaded in {} follow-up page(s)",
        opinions.total_elements(),
        pages
    );
    for c in &snapshot.items {
        print_comment(c);
    }
    opinions.unmount();
    Ok(())
}

fn print_comment(c: &Comment) {
    let indent = if c.is_reply() { "    ↳ " } else { "  - " };
    println!(
        "{}[{:?}] {}: {} (+{} / -{})",
        indent, c.vote_type, c.author_name, c.body, c.like_count, c.dislike_count
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
