//! Text rendering of a [`ClassModel`]

use super::model::ClassModel;
use std::fmt::Write;

/// Fixed header of every generated module
pub const PREAMBLE: &str =
    "#  -*- coding: utf8 -*-\n\nfrom pyxmlmapper import base\nfrom typing import List\n\n\n";

/// Render the model as Python source
///
/// Classes come out in reverse first-seen order, so a nested class is always
/// defined before the class that references it.
pub fn render(model: &ClassModel, indent: &str, source: Option<&str>) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    if let Some(source) = source {
        let _ = write!(out, "#  {}\n\n", source);
    }
    out.push_str(PREAMBLE);

    for class in model.emission_order() {
        out.push_str(&class.header());
        for field in &class.fields {
            let _ = write!(out, "\n{}{}", indent, field.render());
        }
        out.push_str("\n\n\n");
    }
    out
}
