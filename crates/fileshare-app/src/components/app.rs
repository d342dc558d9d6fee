//! Page shell.

use chrono::Datelike;
use dioxus::prelude::*;

use super::{SharedFilesPanel, UploadPanel};

/// Root application component.
#[component]
pub fn App() -> Element {
    let year = chrono::Local::now().year();

    rsx! {
        div {
            class: "page",

            header {
                class: "header",
                h1 { class: "header-title", "Decentralized File Sharing" }
                p {
                    class: "header-subtitle",
                    "Securely upload and share your files on the blockchain."
                }
            }

            main {
                class: "main-content",

                section {
                    class: "card",
                    h2 { class: "card-title", "Upload Files" }
                    UploadPanel {}
                }

                section {
                    class: "card",
                    SharedFilesPanel {}
                }
            }

            footer {
                class: "footer",
                "© {year} Decentralized File Sharing. All rights reserved."
            }
        }
    }
}
