//! Upload panel.
//!
//! Picks a local file, stores it on IPFS and registers the hash with the
//! contract from the account the wallet authorizes.

use dioxus::prelude::*;
use fileshare_core::{
    PickedFile, UploadError, UploadReceipt, UploadState, UploadStatus, connect, submit_file,
};
use tokio_util::sync::CancellationToken;

use crate::services::{Services, services};

/// Connects, then stores and registers one picked file.
pub async fn upload_picked(
    services: &Services,
    file: PickedFile,
    cancel: &CancellationToken,
) -> Result<UploadReceipt, UploadError> {
    let conn = connect(&services.rpc, &services.rpc, &services.artifact, cancel).await?;
    submit_file(
        &services.ipfs,
        conn.registry.as_ref(),
        &conn.account,
        &file.name,
        file.bytes,
        cancel,
    )
    .await
}

#[component]
pub fn UploadPanel() -> Element {
    let mut state = use_signal(UploadState::default);
    let cancel = use_hook(CancellationToken::new);

    {
        let cancel = cancel.clone();
        use_drop(move || cancel.cancel());
    }

    let choose = move |_| {
        spawn(async move {
            let Some(handle) = rfd::AsyncFileDialog::new()
                .set_title("Choose a file to share")
                .pick_file()
                .await
            else {
                return;
            };
            let bytes = handle.read().await;
            state.write().pick(PickedFile {
                name: handle.file_name(),
                bytes,
            });
        });
    };

    let submit = move |_| {
        let Some(file) = state.read().picked.clone() else {
            return;
        };
        let cancel = cancel.clone();
        state.write().status = UploadStatus::Uploading;
        spawn(async move {
            let Some(services) = services() else {
                state.write().status = UploadStatus::Failed("Services not installed".into());
                return;
            };
            let status = match upload_picked(services, file, &cancel).await {
                Ok(receipt) => UploadStatus::Done(receipt),
                Err(UploadError::Cancelled) => return,
                Err(e) => UploadStatus::Failed(e.to_string()),
            };
            state.write().status = status;
        });
    };

    let state_read = state.read();
    let can_submit = state_read.can_submit();
    let picked = state_read
        .picked
        .as_ref()
        .map(|f| format!("{} ({})", f.name, f.size_display()));
    let status = state_read.status.clone();

    rsx! {
        div {
            class: "upload",

            div {
                class: "upload-controls",
                button { class: "btn btn-secondary", onclick: choose, "Choose File" }
                span {
                    class: "picked-file",
                    {picked.unwrap_or_else(|| "No file chosen".to_string())}
                }
                button {
                    class: "btn btn-primary",
                    disabled: !can_submit,
                    onclick: submit,
                    "Upload"
                }
            }

            match status {
                UploadStatus::Idle => rsx! {},
                UploadStatus::Uploading => rsx! {
                    p { class: "loading", "Uploading..." }
                },
                UploadStatus::Done(receipt) => rsx! {
                    p {
                        class: "banner banner-info",
                        "Uploaded {receipt.file_name} ({receipt.content_hash})"
                    }
                },
                UploadStatus::Failed(message) => rsx! {
                    p { class: "banner banner-error", "{message}" }
                },
            }
        }
    }
}
