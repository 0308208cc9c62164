// demos/http_call.rs
//
// Call a JSON-RPC 2.0 endpoint over HTTP.
//
//   cargo run --example http_call --features logging -- http://localhost:8545 eth_blockNumber
//
// The remaining arguments after the method are sent as positional params
// (each parsed as JSON, falling back to a plain string).

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use jsonrpc_context::{RpcContextBuilder, RpcError};

#[tokio::main]
async fn main() -> Result<(), RpcError> {
    // ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8545".to_string());
    let method = args.next().unwrap_or_else(|| "rpc.discover".to_string());

    let params: Vec<Value> = args
        .map(|arg| serde_json::from_str(&arg).unwrap_or(Value::String(arg)))
        .collect();

    let rpc = RpcContextBuilder::new(url).build();

    match rpc.call(&method, params, None).await {
        Ok(Some(result)) => println!("{}", serde_json::to_string_pretty(&result)?),
        Ok(None) => println!("(no result)"),
        Err(RpcError::Protocol(err)) => {
            eprintln!("server error {}: {}", err.code, err.message);
            if let Some(data) = err.data {
                eprintln!("{data}");
            }
        }
        Err(other) => return Err(other),
    }

    Ok(())
}
