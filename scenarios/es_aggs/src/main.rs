use seq_db_http_transport::prelude::HttpTransport;
use seq_load_runner::prelude::*;
use serde_json::json;

fn body() -> BodyTemplate {
    BodyTemplate::fixed(json!({
        "size": 0,
        "aggs": {
            "name": {
                "terms": {
                    "field": "status"
                }
            }
        }
    }))
}

fn main() -> LoadResult<()> {
    // 2 VUs x 5 iterations, 10 requests in total.
    let builder = ScenarioDefinitionBuilder::new_with_init(env!("CARGO_PKG_NAME"))
        .with_target_path("/logs/_search?request_cache=false")
        .with_body(body())
        .with_default_vus(2)
        .with_default_iterations(5);

    let transport = HttpTransport::new(builder.connection_string(), builder.request_timeout())?;

    run(builder, transport)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_matches_wire_format() {
        let rendered = body().render(&VuContext::new(0)).to_string();

        pretty_assertions::assert_eq!(
            r#"{"size":0,"aggs":{"name":{"terms":{"field":"status"}}}}"#,
            rendered
        );
    }
}
