//! Shared files panel.
//!
//! Connects to the wallet once on mount, lists the files shared with the
//! connected account and offers a "View File" action per entry.

use dioxus::prelude::*;
use fileshare_core::{
    BannerTone, FileRecord, InitReport, LoadOutcome, SharedFilesError, SharedFilesState,
    initialize, open_file,
};
use tokio_util::sync::CancellationToken;

use crate::opener::WebviewOpener;
use crate::services::services;

#[component]
pub fn SharedFilesPanel() -> Element {
    let state = use_signal(SharedFilesState::new);
    let cancel = use_hook(CancellationToken::new);

    {
        let cancel = cancel.clone();
        use_drop(move || cancel.cancel());
    }

    use_future(move || {
        let mut state = state;
        let cancel = cancel.clone();
        async move {
            let Some(services) = services() else {
                tracing::error!("Services not installed");
                state.write().apply(InitReport {
                    account: None,
                    outcome: LoadOutcome::Failed(SharedFilesError::Provider(
                        "Services not installed".to_string(),
                    )),
                });
                return;
            };
            let report =
                initialize(&services.rpc, &services.rpc, &services.artifact, &cancel).await;
            if !cancel.is_cancelled() {
                state.write().apply(report);
            }
        }
    });

    let state_read = state.read();
    let banner = state_read.banner();
    let records = state_read.records().to_vec();
    let loading = state_read.is_loading();
    let placeholder = state_read.list_placeholder();
    let account = state_read.account.clone();

    rsx! {
        div {
            class: "shared-files",

            h2 { class: "card-title", "View Shared Files" }

            if let Some(account) = account {
                p { class: "account", "Connected as {account}" }
            }

            if loading {
                p { class: "loading", "Connecting to wallet..." }
            }

            if let Some(banner) = banner {
                p {
                    class: match banner.tone {
                        BannerTone::Info => "banner banner-info",
                        BannerTone::Error => "banner banner-error",
                    },
                    "{banner.text}"
                }
            }

            h3 { class: "list-title", "Your Shared Files" }
            if let Some(placeholder) = placeholder {
                p { class: "placeholder", "{placeholder}" }
            } else {
                ul {
                    class: "file-list",
                    for record in records {
                        FileRow { key: "{record.file_id}", record: record.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn FileRow(record: FileRecord) -> Element {
    let name = record.file_name.clone();

    rsx! {
        li {
            class: "file-row",
            span { class: "file-name", "{name}" }
            button {
                class: "btn btn-secondary",
                onclick: move |_| {
                    let Some(services) = services() else {
                        return;
                    };
                    let url = open_file(&record, &services.gateway, &WebviewOpener);
                    tracing::info!(file = %record.file_name, %url, "Opening file");
                },
                "View File"
            }
        }
    }
}
