use anyhow::Context;
use seq_db_http_transport::prelude::HttpTransport;
use seq_load_runner::prelude::*;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Paging {
    page_size: u64,
    total_pages: u64,
    /// Smallest `size` value matched by the range query.
    lower_bound: u64,
}

fn env_u64(name: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| ConfigurationError::InvalidValue {
                name: name.to_string(),
                reason: format!("{value:?} is not a whole number: {e}"),
            })
            .with_context(|| format!("Failed to read {name}")),
        Err(_) => Ok(default),
    }
}

impl Paging {
    fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            page_size: env_u64("PAGE_SIZE", 100)?,
            total_pages: env_u64("TOTAL_PAGES", 50)?,
            lower_bound: env_u64("LOWER_BOUND", 2_020_645)?,
        })
    }
}

/// Ascending range scan, one page per iteration. Each VU walks pages `0..total_pages` in order
/// and wraps around.
fn body(paging: Paging) -> BodyTemplate {
    BodyTemplate::fixed(json!({
        "query": {
            "query": format!("size:[{} to *]", paging.lower_bound),
            "from": "2000-01-01T00:00:00Z",
            "to": "2050-01-01T00:00:00Z",
            "explain": false
        },
        "order": "ORDER_ASC",
        "size": paging.page_size,
        "offset": 0
    }))
    .with_parameter(
        "/offset",
        Parameter::PageOffset {
            page_size: paging.page_size,
            total_pages: paging.total_pages,
        },
    )
}

fn main() -> LoadResult<()> {
    let paging = Paging::from_env()?;

    let builder = ScenarioDefinitionBuilder::new_with_init(env!("CARGO_PKG_NAME"))
        .with_target_path("/complex-search")
        .with_body(body(paging))
        .with_default_vus(20)
        .with_default_duration_s(10)
        .add_env("PAGE_SIZE", paging.page_size)
        .add_env("TOTAL_PAGES", paging.total_pages)
        .add_env("LOWER_BOUND", paging.lower_bound);

    let transport = HttpTransport::new(builder.connection_string(), builder.request_timeout())?;

    run(builder, transport)?;

    Ok(())
}
