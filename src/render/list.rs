/// Flat ranked list: the same items, no animation state.

use crate::cloud::CloudData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRow<'a> {
    pub rank: u32,
    pub label: &'a str,
    pub count: u32,
    pub icon: &'a str,
}

/// Rows by descending count, ties in rank order. Reads the order computed
/// at build time; nothing is re-ranked here.
pub fn ranked_rows(data: &CloudData) -> Vec<ListRow<'_>> {
    data.list_order()
        .iter()
        .filter_map(|&i| data.get(i))
        .map(|item| ListRow {
            rank: item.rank,
            label: &item.label,
            count: item.count,
            icon: &item.icon,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::InterestBatch;

    #[test]
    fn test_rows_sorted_by_count() {
        let batch = InterestBatch::new(
            ["tea", "chess", "go", "poker"],
            [("chess", 9), ("poker", 8), ("tea", 7), ("go", 8)],
            ["a.png", "b.png"],
        );
        let data = CloudData::build(&batch).unwrap();
        let rows = ranked_rows(&data);
        let labels: Vec<&str> = rows.iter().map(|r| r.label).collect();
        // go and poker tie on 8; go appears first in the input
        assert_eq!(labels, vec!["chess", "go", "poker", "tea"]);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        // Icons stay positional
        assert_eq!(rows[0].icon, "b.png");
        assert_eq!(rows[3].icon, "a.png");
        for w in rows.windows(2) {
            assert!(w[0].count >= w[1].count);
        }
    }

    #[test]
    fn test_rows_empty() {
        let batch = InterestBatch::new(Vec::<&str>::new(), Vec::<(&str, u32)>::new(), ["a.png"]);
        let data = CloudData::build(&batch).unwrap();
        assert!(ranked_rows(&data).is_empty());
    }
}
