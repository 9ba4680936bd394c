use crate::config::ArrayLayoutConfig;
use crate::ir::ArrayData;

use super::types::{ArrayCell, ArrayLayout, Canvas};

pub fn layout_array(
    data: &ArrayData,
    highlights: &[String],
    canvas: Canvas,
    config: &ArrayLayoutConfig,
) -> ArrayLayout {
    let count = data.elements.len();
    let pitch = ((canvas.width - config.side_padding) / count.max(1) as f32)
        .min(config.max_cell_width)
        .max(0.0);
    let start_x = (canvas.width - count as f32 * pitch) / 2.0;
    let y = (canvas.height - config.cell_height) / 2.0;

    let cells = data
        .elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let label = element.to_string();
            let index_key = index.to_string();
            let highlighted = highlights.iter().any(|h| *h == index_key || *h == label);
            ArrayCell {
                index,
                label,
                x: start_x + index as f32 * pitch,
                y,
                width: (pitch - config.cell_gap).max(0.0),
                height: config.cell_height,
                highlighted,
            }
        })
        .collect();

    ArrayLayout {
        cells,
        pitch,
        index_label_y: y + config.cell_height + config.index_label_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Scalar;

    fn data(values: &[i64]) -> ArrayData {
        ArrayData {
            elements: values.iter().map(|v| Scalar::Number((*v).into())).collect(),
        }
    }

    #[test]
    fn cells_are_centered_and_capped_in_width() {
        let layout = layout_array(
            &data(&[2, 7, 11, 15]),
            &[],
            Canvas::new(600.0, 200.0),
            &ArrayLayoutConfig::default(),
        );
        assert_eq!(layout.pitch, 60.0);
        assert_eq!(layout.cells[0].x, 180.0);
        assert_eq!(layout.cells[3].x, 360.0);
        assert_eq!(layout.cells[0].y, 80.0);
        assert_eq!(layout.cells[0].width, 58.0);
        assert_eq!(layout.index_label_y, 135.0);
    }

    #[test]
    fn long_arrays_shrink_to_fit() {
        let values: Vec<i64> = (0..56).collect();
        let layout = layout_array(&data(&values), &[], Canvas::new(600.0, 200.0), &ArrayLayoutConfig::default());
        assert_eq!(layout.pitch, 10.0);
        let last = layout.cells.last().unwrap();
        assert!(last.x + last.width <= 600.0);
        assert!(layout.cells[0].x >= 0.0);
    }

    #[test]
    fn highlights_match_index_or_value() {
        let highlights = vec!["0".to_string(), "15".to_string()];
        let layout = layout_array(
            &data(&[2, 7, 11, 15]),
            &highlights,
            Canvas::new(600.0, 200.0),
            &ArrayLayoutConfig::default(),
        );
        let flags: Vec<bool> = layout.cells.iter().map(|c| c.highlighted).collect();
        assert_eq!(flags, vec![true, false, false, true]);
    }
}
