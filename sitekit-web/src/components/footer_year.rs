use web_sys::Document;

pub const YEAR_ID: &str = "year";

/// Write the current calendar year into `#year`; returns whether it was found.
pub fn stamp(doc: &Document) -> bool {
    let Some(node) = doc.get_element_by_id(YEAR_ID) else {
        return false;
    };
    let year = js_sys::Date::new_0().get_full_year();
    node.set_text_content(Some(&year.to_string()));
    true
}
