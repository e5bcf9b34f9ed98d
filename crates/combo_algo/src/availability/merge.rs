//! Stock merge: a value is enabled iff some surviving combination carrying it
//! is in stock. Monotonic OR, so catalog order never matters.

use std::collections::HashMap;

use combo_core::{AttributeId, Combination, ValueId};

pub fn merge_stock(survivors: &[&Combination], attribute: AttributeId) -> HashMap<ValueId, bool> {
    let mut stock: HashMap<ValueId, bool> = HashMap::new();
    for c in survivors {
        let Some(row) = c.row(attribute) else { continue };
        for &value in &row.value_ids {
            *stock.entry(value).or_insert(false) |= c.in_stock();
        }
    }
    stock
}

#[cfg(test)]
mod tests {
    use super::*;
    use combo_core::AttributeRow;

    #[test]
    fn in_stock_wins_in_either_order() {
        let a = AttributeId::new(2);
        let out_of_stock = Combination::new(vec![AttributeRow::new(a, [ValueId::new(20)])], false);
        let in_stock = Combination::new(
            vec![AttributeRow::new(a, [ValueId::new(20), ValueId::new(21)])],
            true,
        );
        let dead = Combination::new(vec![AttributeRow::new(a, [ValueId::new(22)])], false);

        let fwd = merge_stock(&[&out_of_stock, &in_stock, &dead], a);
        let rev = merge_stock(&[&dead, &in_stock, &out_of_stock], a);
        assert_eq!(fwd, rev);
        assert_eq!(fwd[&ValueId::new(20)], true);
        assert_eq!(fwd[&ValueId::new(21)], true);
        assert_eq!(fwd[&ValueId::new(22)], false);
    }
}
