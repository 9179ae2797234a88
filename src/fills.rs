//! Turns tagged outlines into filled paths with `lopdf`.
//!
//! `genpdf` 0.2 only exposes stroked lines, so [`crate::elements::Canvas`]
//! draws every filled shape as an outline whose first point is repeated. This
//! pass finds those paths in the page content streams and paints them with
//! `f` in the colour they were stroked with. Other paths are left alone.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object};

const PATH_SEGMENTS: [&str; 5] = ["l", "c", "v", "y", "h"];

/// Rewrites every tagged outline in `pdf_bytes` as a fill.
///
/// Returns the new document and the number of filled shapes. The input is
/// returned unchanged when it contains no tagged outline.
pub fn apply_fills(pdf_bytes: &[u8]) -> Result<(Vec<u8>, usize), lopdf::Error> {
    let mut document = Document::load_mem(pdf_bytes)?;
    let mut filled = 0;
    for page_id in document.get_pages().into_values() {
        let content = Content::decode(&document.get_page_content(page_id)?)?;
        let (operations, count) = fill_tagged_paths(&content.operations);
        if count == 0 {
            continue;
        }
        filled += count;
        document.change_page_content(page_id, Content { operations }.encode()?)?;
    }
    if filled == 0 {
        return Ok((pdf_bytes.to_vec(), 0));
    }

    document.compress();
    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok((buffer, filled))
}

/// Replaces each tagged stroke with `q <colour> rg <path> f Q`.
pub(crate) fn fill_tagged_paths(operations: &[Operation]) -> (Vec<Operation>, usize) {
    let mut output = Vec::with_capacity(operations.len());
    let mut fill_color: Option<Operation> = None;
    let mut filled = 0;
    let mut index = 0;
    while index < operations.len() {
        let operation = &operations[index];
        if let Some(color) = fill_color_for(operation) {
            fill_color = Some(color);
        }

        if let Some(end) = tagged_path_end(operations, index) {
            output.push(Operation::new("q", Vec::new()));
            output.extend(fill_color.iter().cloned());
            output.push(operation.clone());
            output.extend(operations[index + 2..end].iter().cloned());
            output.push(Operation::new("f", Vec::new()));
            output.push(Operation::new("Q", Vec::new()));
            filled += 1;
            index = end + 1;
            continue;
        }

        output.push(operation.clone());
        index += 1;
    }
    (output, filled)
}

/// The non-stroking counterpart of a stroke colour operation.
fn fill_color_for(operation: &Operation) -> Option<Operation> {
    let operator = match operation.operator.as_str() {
        "RG" => "rg",
        "G" => "g",
        "K" => "k",
        _ => return None,
    };
    Some(Operation::new(operator, operation.operands.clone()))
}

/// Index of the `S` closing a path that starts at `start` with a zero-length segment.
fn tagged_path_end(operations: &[Operation], start: usize) -> Option<usize> {
    let first = operations.get(start)?;
    let second = operations.get(start + 1)?;
    if first.operator != "m" || second.operator != "l" || !same_point(&first.operands, &second.operands) {
        return None;
    }
    let end = (start + 2..operations.len())
        .find(|&index| !PATH_SEGMENTS.contains(&operations[index].operator.as_str()))?;
    (operations[end].operator == "S").then_some(end)
}

fn same_point(a: &[Object], b: &[Object]) -> bool {
    a.len() == 2
        && b.len() == 2
        && a.iter().zip(b).all(|(p, q)| {
            matches!((p.as_float(), q.as_float()), (Ok(p), Ok(q)) if p == q)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: &str, operands: &[f32]) -> Operation {
        Operation::new(operator, operands.iter().map(|&value| Object::from(value)).collect())
    }

    fn operators(operations: &[Operation]) -> Vec<&str> {
        operations.iter().map(|op| op.operator.as_str()).collect()
    }

    #[test]
    fn tagged_outline_becomes_a_fill_in_its_stroke_colour() {
        let operations = vec![
            op("RG", &[0.0, 0.5, 0.75]),
            op("m", &[10.0, 10.0]),
            op("l", &[10.0, 10.0]),
            op("l", &[20.0, 10.0]),
            op("l", &[20.0, 20.0]),
            op("S", &[]),
            op("RG", &[0.0, 0.0, 0.0]),
        ];

        let (output, filled) = fill_tagged_paths(&operations);

        assert_eq!(filled, 1);
        assert_eq!(
            operators(&output),
            vec!["RG", "q", "rg", "m", "l", "l", "f", "Q", "RG"]
        );
        let fill: Vec<f64> = output[2]
            .operands
            .iter()
            .filter_map(|operand| operand.as_float().ok().map(f64::from))
            .collect();
        assert_eq!(fill, vec![0.0, 0.5, 0.75]);
    }

    #[test]
    fn ordinary_lines_stay_stroked() {
        let operations = vec![
            op("RG", &[0.0, 0.0, 0.0]),
            op("m", &[0.0, 0.0]),
            op("l", &[5.0, 0.0]),
            op("S", &[]),
        ];

        let (output, filled) = fill_tagged_paths(&operations);

        assert_eq!(filled, 0);
        assert_eq!(operators(&output), operators(&operations));
    }

    #[test]
    fn unpainted_tagged_paths_are_untouched() {
        let operations = vec![op("m", &[1.0, 1.0]), op("l", &[1.0, 1.0]), op("n", &[])];
        let (output, filled) = fill_tagged_paths(&operations);
        assert_eq!(filled, 0);
        assert_eq!(operators(&output), vec!["m", "l", "n"]);
    }

    #[test]
    fn garbage_input_is_an_error() {
        assert!(apply_fills(b"not a pdf").is_err());
    }
}
