//! Descending score order with an explicit tie policy.
//!
//! Both the ranking export and link-back walk items from the highest to the
//! lowest score. Historically the order was produced by a stable ascending
//! sort followed by a reversal, which puts the *later* of two equal-scored
//! items first. Results that must match earlier runs bit for bit depend on
//! that, so it is the default.
//!
//! ```text
//! input:          a:0.9  b:0.5  c:0.9
//! ReverseInsertion  c:0.9  a:0.9  b:0.5
//! Insertion         a:0.9  c:0.9  b:0.5
//! ```

use serde::{Deserialize, Serialize};

/// How items with equal scores are ordered in a descending walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieOrder {
    /// Later items first (ascending stable sort, then reverse).
    #[default]
    ReverseInsertion,
    /// Earlier items first (stable descending sort).
    Insertion,
}

impl std::str::FromStr for TieOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reverse-insertion" | "reverse" => Ok(TieOrder::ReverseInsertion),
            "insertion" | "stable" => Ok(TieOrder::Insertion),
            other => Err(format!(
                "unknown tie order '{}' (expected reverse-insertion or insertion)",
                other
            )),
        }
    }
}

/// Sort `items` by descending key.
///
/// Keys are compared with [`f64::total_cmp`], so NaN sorts above every number.
pub fn sort_descending<T, F>(items: &mut [T], tie_order: TieOrder, key: F)
where
    F: Fn(&T) -> f64,
{
    match tie_order {
        TieOrder::ReverseInsertion => {
            items.sort_by(|a, b| key(a).total_cmp(&key(b)));
            items.reverse();
        }
        TieOrder::Insertion => items.sort_by(|a, b| key(b).total_cmp(&key(a))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(tie: TieOrder) -> Vec<char> {
        let mut v = vec![('a', 0.9), ('b', 0.5), ('c', 0.9), ('d', 0.5)];
        sort_descending(&mut v, tie, |p| p.1);
        v.into_iter().map(|p| p.0).collect()
    }

    #[test]
    fn reverse_insertion_puts_later_ties_first() {
        assert_eq!(order(TieOrder::ReverseInsertion), vec!['c', 'a', 'd', 'b']);
    }

    #[test]
    fn insertion_keeps_input_order_among_ties() {
        assert_eq!(order(TieOrder::Insertion), vec!['a', 'c', 'b', 'd']);
    }

    #[test]
    fn nan_sorts_first() {
        let mut v = vec![1.0, f64::NAN, 2.0];
        sort_descending(&mut v, TieOrder::default(), |x| *x);
        assert!(v[0].is_nan());
        assert_eq!(&v[1..], &[2.0, 1.0]);
    }

    #[test]
    fn parse() {
        assert_eq!("insertion".parse::<TieOrder>().unwrap(), TieOrder::Insertion);
        assert_eq!(
            "reverse-insertion".parse::<TieOrder>().unwrap(),
            TieOrder::ReverseInsertion
        );
        assert!("sideways".parse::<TieOrder>().is_err());
    }
}
