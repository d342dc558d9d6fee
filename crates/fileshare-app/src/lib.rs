//! Desktop front-end for decentralized file sharing
//!
//! A Dioxus desktop application with two panels: one uploads a file to
//! IPFS and registers it with the file-sharing contract, the other lists
//! the files shared with the connected account.

pub mod cli;
pub mod components;
pub mod opener;
pub mod services;
