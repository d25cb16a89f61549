use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::extract::{CounterFragment, PageSnapshot, RowFragment};

/// CSS selectors for the dashboard layout.
pub mod selectors {
    /// SVG groups wrapping each counter tooltip; the id names the game.
    /// Only `tooltip-` prefixed groups are read, and groups are assumed flat.
    pub const COUNTER_GROUP: &str = "g[id^='tooltip-']";
    pub const COUNTER_TOOLTIP: &str = "div#CustomToolTip";
    pub const HISTORY_ROW: &str = "tr[data-slot='table-row']";
    pub const ROW_DATE: &str = "p.dateTime_DateTime__date__bXWTP";
    pub const ROW_TIME: &str = "p.dateTime_DateTime__time__f0_Bn";
    pub const ROW_RESULT_IMAGE: &str = "td img[alt='Spin Result']";
    pub const ROW_BADGE: &str = "span[data-slot='badge']";
}

/// One element returned by a page query.
#[async_trait]
pub trait PageElement: Send + Sync {
    async fn inner_text(&self) -> Result<String>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Descendants of this element matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>>;
}

/// A rendered page that can be (re)loaded and queried.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Bring the page to a freshly rendered state for this cycle.
    async fn load(&mut self) -> Result<()>;

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>>;
}

/// Read the counters and the first `history_rows` history rows off the page.
///
/// Empty query results are not errors; they yield an empty snapshot.
pub async fn collect_snapshot(page: &dyn PageSource, history_rows: usize) -> Result<PageSnapshot> {
    let mut counters = Vec::new();
    for group in page.query_all(selectors::COUNTER_GROUP).await? {
        let group_id = group.attribute("id").await?;
        for tooltip in group.query_all(selectors::COUNTER_TOOLTIP).await? {
            counters.push(CounterFragment {
                group_id: group_id.clone(),
                text: tooltip.inner_text().await?,
            });
        }
    }

    let mut rows = Vec::new();
    for row in page
        .query_all(selectors::HISTORY_ROW)
        .await?
        .into_iter()
        .take(history_rows)
    {
        rows.push(read_row(row.as_ref()).await?);
    }

    debug!(
        "Snapshot: {} counter(s), {} history row(s)",
        counters.len(),
        rows.len()
    );
    Ok(PageSnapshot { counters, rows })
}

/// Reload the page, then collect a snapshot from it.
pub async fn load_snapshot(
    page: &mut dyn PageSource,
    history_rows: usize,
) -> Result<PageSnapshot> {
    page.load().await?;
    collect_snapshot(page, history_rows).await
}

async fn read_row(row: &dyn PageElement) -> Result<RowFragment> {
    let mut date_parts = Vec::new();
    for date in row.query_all(selectors::ROW_DATE).await? {
        date_parts.push(date.inner_text().await?);
    }
    let time_text = match row.query_all(selectors::ROW_TIME).await?.first() {
        Some(el) => Some(el.inner_text().await?),
        None => None,
    };
    let image_src = match row.query_all(selectors::ROW_RESULT_IMAGE).await?.first() {
        Some(el) => el.attribute("src").await?,
        None => None,
    };
    let mut badges = Vec::new();
    for badge in row.query_all(selectors::ROW_BADGE).await? {
        badges.push(badge.inner_text().await?);
    }
    Ok(RowFragment {
        date_parts,
        time_text,
        image_src,
        badges,
    })
}
