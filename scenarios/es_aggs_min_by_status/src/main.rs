use seq_db_http_transport::prelude::HttpTransport;
use seq_load_runner::prelude::*;
use serde_json::json;

/// Terms aggregation over `status` with a nested `min` of `size` per bucket.
fn body() -> BodyTemplate {
    BodyTemplate::fixed(json!({
        "size": 0,
        "aggs": {
            "by_status": {
                "terms": {
                    "field": "status",
                    "size": 1000
                },
                "aggs": {
                    "min_request_time": {
                        "min": {
                            "field": "size"
                        }
                    }
                }
            }
        }
    }))
}

fn main() -> LoadResult<()> {
    let builder = ScenarioDefinitionBuilder::new_with_init(env!("CARGO_PKG_NAME"))
        .with_target_path("/logs/_search?request_cache=false")
        .with_body(body())
        .with_default_vus(1)
        .with_default_iterations(5)
        .use_check(Check::ok());

    let transport = HttpTransport::new(builder.connection_string(), builder.request_timeout())?;

    run(builder, transport)?;

    Ok(())
}
