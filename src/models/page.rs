use serde::{Deserialize, Serialize};

/// One page of a filtered result set.
///
/// `total` is the full filtered count server-side; `items.len()` is at most
/// the requested page size.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PageResult<T> {
    /// Whether a next page exists for the given position
    pub fn has_next(&self, page_num: u32, page_size: u32) -> bool {
        (page_num as u64) * (page_size as u64) < self.total
    }
}

// Legacy list endpoints return a bare JSON array with no count; the client
// still accepts those and treats the item count as a floor for `total`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PageResultWire<T> {
    Counted { items: Vec<T>, total: u64 },
    Bare(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PageResult<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match PageResultWire::deserialize(deserializer)? {
            PageResultWire::Counted { items, total } => Ok(PageResult { items, total }),
            PageResultWire::Bare(items) => {
                let total = items.len() as u64;
                Ok(PageResult { items, total })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_next() {
        let page: PageResult<u32> = PageResult { items: vec![1, 2, 3], total: 7 };
        assert!(page.has_next(1, 3));
        assert!(page.has_next(2, 3));
        assert!(!page.has_next(3, 3));
    }

    #[test]
    fn test_decodes_counted_envelope() {
        let page: PageResult<u32> = serde_json::from_str(r#"{"items":[1,2],"total":9}"#).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total, 9);
    }

    #[test]
    fn test_decodes_bare_array() {
        let page: PageResult<u32> = serde_json::from_str("[4,5,6]").unwrap();
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 3);
    }
}
