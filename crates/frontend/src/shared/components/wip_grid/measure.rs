use contracts::shared::grid::LayoutMeasure;
use wasm_bindgen::JsCast;

/// Measures the rendered widths of the pinned header cells of one table.
pub struct DomMeasure<'a> {
    pub table_id: &'a str,
}

impl LayoutMeasure for DomMeasure<'_> {
    fn fixed_header_widths(&self) -> Vec<f64> {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Vec::new();
        };
        let selector = format!("#{} thead th[data-sticky=\"true\"]", self.table_id);
        let Ok(cells) = document.query_selector_all(&selector) else {
            return Vec::new();
        };

        (0..cells.length())
            .filter_map(|i| cells.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(|el| el.get_bounding_client_rect().width())
            .collect()
    }
}
