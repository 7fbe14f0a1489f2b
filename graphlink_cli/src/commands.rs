use crate::cli::CallArgs;
use graphlink_core::{
    GraphPlugin, GraphPluginOptions, GraphQueryOptions, LinkedAccount, MemoryAccountStore,
    ODataQuery, Session, ENDPOINTS, GRAPH_BASE_URL, MICROSOFT_PROVIDER_ID,
};
use owo_colors::OwoColorize;
use std::sync::Arc;

const LOCAL_USER: &str = "local";

pub fn run_operations() {
    println!("{}", "Operations".bold());
    for spec in &ENDPOINTS {
        println!(
            "  {:<14} GET {:<28} shape={:<7} scope={}",
            spec.name,
            spec.route,
            match spec.shape {
                graphlink_core::ResponseShape::Single => "single",
                graphlink_core::ResponseShape::Array => "array",
            },
            spec.scope
        );
    }
}

pub async fn run_call(args: CallArgs) -> Result<(), String> {
    let store = Arc::new(MemoryAccountStore::new());
    store.insert(
        LinkedAccount::new(LOCAL_USER, MICROSOFT_PROVIDER_ID).with_access_token(args.token.as_str()),
    );

    let options = GraphPluginOptions {
        debug_logs: args.debug_logs,
        base_url: args
            .base_url
            .clone()
            .unwrap_or_else(|| GRAPH_BASE_URL.to_string()),
    };
    let plugin = GraphPlugin::new(options, store)
        .map_err(|e| format!("failed to build HTTP client: {}", e))?;

    let session = Session::authenticated(LOCAL_USER);
    let query_options = query_options_from(&args);

    let Some(envelope) = plugin
        .call_raw(&args.operation, &session, query_options)
        .await
    else {
        let known: Vec<&str> = ENDPOINTS.iter().map(|e| e.name).collect();
        return Err(format!(
            "unknown operation '{}'; expected one of: {}",
            args.operation,
            known.join(", ")
        ));
    };

    let rendered = serde_json::to_string_pretty(&envelope)
        .map_err(|e| format!("failed to render envelope: {}", e))?;
    println!("{}", rendered);

    if envelope.success {
        Ok(())
    } else {
        // Envelope already printed; signal failure via exit status only.
        Err(String::new())
    }
}

fn query_options_from(args: &CallArgs) -> Option<GraphQueryOptions> {
    let query = ODataQuery {
        select: args.select.clone(),
        filter: args.filter.clone(),
        expand: args.expand.clone(),
        orderby: args.orderby.clone(),
        top: args.top,
        skip: args.skip,
        search: args.search.clone(),
        count: args.count,
    };
    if query == ODataQuery::default() {
        return None;
    }
    Some(GraphQueryOptions {
        query: Some(query),
        headers: None,
    })
}
