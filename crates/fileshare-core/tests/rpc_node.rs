//! Runs `RpcClient` against a minimal JSON-RPC node served over local HTTP.

use std::sync::{Arc, Mutex};

use fileshare_core::abi::{self, Arg};
use fileshare_core::mock::sample_artifact;
use fileshare_core::rpc::CALL_GAS;
use fileshare_core::{
    Account, FileId, LoadOutcome, RpcClient, SharedFilesError, WalletProvider, initialize,
};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

const ME: &str = "0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1";

/// How the node answers `eth_requestAccounts`.
#[derive(Clone, Copy)]
enum AccessReply {
    MethodNotFound,
    Rejected,
}

#[derive(Clone)]
struct Node {
    access: AccessReply,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl Node {
    fn methods(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r["method"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    fn calls(&self) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r["method"] == "eth_call")
            .map(|r| r["params"].clone())
            .collect()
    }

    fn reply(&self, request: &Value) -> Value {
        let id = request["id"].clone();
        let ok = |result: Value| json!({ "jsonrpc": "2.0", "id": id, "result": result });
        let err = |code: i64, message: &str| {
            json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
        };

        match request["method"].as_str().unwrap_or_default() {
            "eth_requestAccounts" => match self.access {
                AccessReply::MethodNotFound => err(-32601, "Method eth_requestAccounts not found"),
                AccessReply::Rejected => err(4001, "User rejected the request."),
            },
            "eth_accounts" => ok(json!([ME])),
            "net_version" => ok(json!("5777")),
            "eth_call" => {
                let data = request["params"][0]["data"].as_str().unwrap_or_default();
                let data = abi::decode_hex(data).unwrap();
                match contract_call(&data) {
                    Some(raw) => ok(json!(abi::encode_hex(&raw))),
                    None => err(-32000, "execution reverted"),
                }
            }
            _ => err(-32601, "Method not found"),
        }
    }
}

fn word(value: u64) -> Vec<u8> {
    let mut w = vec![0u8; 32];
    w[24..].copy_from_slice(&value.to_be_bytes());
    w
}

/// `getSharedFiles` lists ids 1, 2 and 3; `getFile(2)` reverts.
fn contract_call(data: &[u8]) -> Option<Vec<u8>> {
    let (selector, args) = data.split_at(4);
    if selector == abi::selector("getSharedFiles()") {
        let mut out = word(0x20);
        out.extend(word(3));
        for id in 1..=3 {
            out.extend(word(id));
        }
        return Some(out);
    }
    if selector == abi::selector("getFile(uint256)") {
        let id = u64::from_be_bytes(args.get(24..32)?.try_into().ok()?);
        let (hash, name) = match id {
            1 => ("QmFirst", "first.txt"),
            3 => ("QmThird", "third.pdf"),
            _ => return None,
        };
        // A (string,string) tuple encodes like call arguments without the selector.
        return Some(abi::encode_call([0; 4], &[Arg::Str(hash), Arg::Str(name)])[4..].to_vec());
    }
    None
}

async fn serve_one(node: Node, mut stream: TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let (head_end, content_length) = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            break (pos + 4, length);
        }
    };
    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let request: Value = serde_json::from_slice(&buf[head_end..head_end + content_length]).unwrap();
    let body = node.reply(&request).to_string();
    node.requests.lock().unwrap().push(request);

    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.ok();
}

async fn start_node(access: AccessReply) -> (Node, RpcClient) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let node = Node {
        access,
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let server = node.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve_one(server.clone(), stream));
        }
    });

    (node, RpcClient::new(url).unwrap())
}

#[tokio::test]
async fn test_initialize_over_json_rpc() {
    let (node, rpc) = start_node(AccessReply::MethodNotFound).await;

    let report = initialize(&rpc, &rpc, &sample_artifact(), &CancellationToken::new()).await;

    assert_eq!(report.account, Some(Account::new(ME)));
    let LoadOutcome::Loaded(records) = report.outcome else {
        panic!("expected records, got {:?}", report.outcome);
    };
    let ids: Vec<FileId> = records.iter().map(|r| r.file_id).collect();
    assert_eq!(ids, vec![FileId::from(1), FileId::from(3)]);
    assert_eq!(records[0].content_hash, "QmFirst");
    assert_eq!(records[0].file_name, "first.txt");
    assert_eq!(records[1].content_hash, "QmThird");
    assert_eq!(records[1].file_name, "third.pdf");

    // Access falls back to eth_accounts before the regular account listing.
    let methods = node.methods();
    assert_eq!(
        &methods[..4],
        &["eth_requestAccounts", "eth_accounts", "eth_accounts", "net_version"]
    );

    let calls = node.calls();
    assert_eq!(calls.len(), 4);
    let listing = &calls[0];
    assert_eq!(listing[0]["from"], ME);
    assert_eq!(listing[0]["to"], "0x5fbdb2315678afecb367f032d93f642f64180aa3");
    assert_eq!(listing[0]["gas"], CALL_GAS);
    assert_eq!(listing[1], "latest");
}

#[tokio::test]
async fn test_rejected_access_over_json_rpc() {
    let (node, rpc) = start_node(AccessReply::Rejected).await;

    let err = rpc.request_account_access().await.unwrap_err();
    assert_eq!(err.message, "User rejected the request.");

    let report = initialize(&rpc, &rpc, &sample_artifact(), &CancellationToken::new()).await;
    assert_eq!(
        report.outcome,
        LoadOutcome::Failed(SharedFilesError::AuthorizationDenied(
            "User rejected the request.".to_string()
        ))
    );
    assert!(!node.methods().iter().any(|m| m == "eth_accounts"));
}
