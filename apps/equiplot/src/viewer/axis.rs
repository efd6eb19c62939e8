/// Half-width, in milliseconds, given to a time range made of a single instant.
const SINGLE_INSTANT_PAD_MS: f64 = 60_000.0;

pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Value axis range with 5% headroom on both sides.
pub fn padded_bounds(range: Option<(f64, f64)>) -> (f64, f64) {
    let Some((min, max)) = range else {
        return (0.0, 1.0);
    };
    if max <= min {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Time axis range in epoch milliseconds.
pub fn time_bounds(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        None => (0.0, SINGLE_INSTANT_PAD_MS),
        Some((min, max)) if max <= min => (min - SINGLE_INSTANT_PAD_MS, max + SINGLE_INSTANT_PAD_MS),
        Some(bounds) => bounds,
    }
}

/// `count` evenly spaced values from `min` to `max`, both ends included.
pub fn ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let count = count.max(2);
    let step = (max - min) / (count - 1) as f64;
    (0..count)
        .map(|i| if i == count - 1 { max } else { min + step * i as f64 })
        .collect()
}

/// Cell index of `value` within a span of `cells` cells.
pub fn cell_offset(value: f64, min: f64, max: f64, cells: u16) -> u16 {
    if cells == 0 || max <= min {
        return 0;
    }
    let ratio = ((value - min) / (max - min)).clamp(0.0, 1.0);
    (ratio * f64::from(cells - 1)).round() as u16
}

/// Splits a tick label at its first whitespace so date and time sit on
/// separate rows.
pub fn stack_label(label: &str) -> (String, String) {
    match label.split_once(char::is_whitespace) {
        Some((head, tail)) => (head.to_string(), tail.trim_start().to_string()),
        None => (label.to_string(), String::new()),
    }
}

/// Lays out stacked tick labels centred on their columns. A label that would
/// touch the previous one is dropped from both rows.
pub fn tick_rows(placements: &[(u16, String)], width: u16) -> (String, String) {
    let width = usize::from(width);
    let mut top = vec![' '; width];
    let mut bottom = vec![' '; width];
    let mut next_free = 0usize;

    for (column, label) in placements {
        let (head, tail) = stack_label(label);
        let label_width = head.chars().count().max(tail.chars().count());
        if label_width == 0 || label_width > width {
            continue;
        }
        let start = usize::from(*column)
            .saturating_sub(label_width / 2)
            .min(width - label_width);
        if start < next_free {
            continue;
        }
        for (row, text) in [(&mut top, &head), (&mut bottom, &tail)] {
            let text_width = text.chars().count();
            let offset = start + (label_width - text_width) / 2;
            for (i, ch) in text.chars().enumerate() {
                row[offset + i] = ch;
            }
        }
        next_free = start + label_width + 1;
    }

    (
        top.into_iter().collect::<String>().trim_end().to_string(),
        bottom.into_iter().collect::<String>().trim_end().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::{
        cell_offset, padded_bounds, stack_label, tick_rows, ticks, time_bounds, value_range,
    };

    #[test]
    fn padded_bounds_handles_flat_and_missing_ranges() {
        assert_eq!(padded_bounds(None), (0.0, 1.0));
        assert_eq!(padded_bounds(Some((5.0, 5.0))), (4.0, 6.0));
        let (lo, hi) = padded_bounds(Some((0.0, 100.0)));
        assert_eq!((lo, hi), (-5.0, 105.0));
    }

    #[test]
    fn time_bounds_widen_a_single_instant() {
        assert_eq!(time_bounds(Some((0.0, 0.0))), (-60_000.0, 60_000.0));
        assert_eq!(time_bounds(Some((1.0, 9.0))), (1.0, 9.0));
    }

    #[test]
    fn value_range_ignores_non_finite() {
        assert_eq!(
            value_range([3.0, f64::NAN, -2.0, f64::INFINITY, 7.5]),
            Some((-2.0, 7.5))
        );
        assert_eq!(value_range(std::iter::empty()), None);
    }

    #[test]
    fn ticks_include_both_ends() {
        assert_eq!(ticks(0.0, 10.0, 3), vec![0.0, 5.0, 10.0]);
        assert_eq!(ticks(0.0, 10.0, 0), vec![0.0, 10.0]);
    }

    #[test]
    fn cell_offset_maps_ends_to_first_and_last_cell() {
        assert_eq!(cell_offset(0.0, 0.0, 10.0, 11), 0);
        assert_eq!(cell_offset(10.0, 0.0, 10.0, 11), 10);
        assert_eq!(cell_offset(5.0, 0.0, 10.0, 11), 5);
        assert_eq!(cell_offset(50.0, 0.0, 10.0, 11), 10);
        assert_eq!(cell_offset(1.0, 0.0, 10.0, 0), 0);
    }

    #[test]
    fn stack_label_splits_date_from_time() {
        assert_eq!(
            stack_label("2023-11-14 22:13"),
            ("2023-11-14".to_string(), "22:13".to_string())
        );
        assert_eq!(stack_label("22:13"), ("22:13".to_string(), String::new()));
    }

    #[test]
    fn tick_rows_place_labels_and_drop_overlaps() {
        let placements = vec![
            (0, "2023-11-14 22:13".to_string()),
            (3, "2023-11-14 22:14".to_string()),
            (29, "2023-11-14 22:16".to_string()),
        ];
        let (top, bottom) = tick_rows(&placements, 30);
        assert_eq!(top, "2023-11-14          2023-11-14");
        assert_eq!(bottom, "  22:13               22:16");
    }
}
