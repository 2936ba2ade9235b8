/// Outcome of looking at one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Buy,
    /// Market price is too far above the catalog price.
    TooExpensive,
    /// Acceptable price, but it does not fit in the remaining budget.
    OverBudget,
}

/// Buy when `current <= base * (1 + max_markup)` and it still fits the budget.
pub fn decide(base: f64, current: f64, max_markup: f64, spent: f64, budget: f64) -> Decision {
    if current > base * (1.0 + max_markup) {
        Decision::TooExpensive
    } else if spent + current > budget {
        Decision::OverBudget
    } else {
        Decision::Buy
    }
}

pub struct Cart {
    budget: f64,
    spent: f64,
    purchased: Vec<(String, f64)>,
}

impl Cart {
    pub fn new(budget: f64) -> Self {
        Self {
            budget,
            spent: 0.0,
            purchased: Vec::new(),
        }
    }

    /// Decides on `item` and records the purchase when it goes through.
    pub fn consider(&mut self, item: &str, base: f64, current: f64, max_markup: f64) -> Decision {
        let d = decide(base, current, max_markup, self.spent, self.budget);
        if d == Decision::Buy {
            self.spent += current;
            self.purchased.push((item.to_string(), current));
        }
        d
    }

    pub fn spent(&self) -> f64 {
        self.spent
    }

    pub fn remaining(&self) -> f64 {
        self.budget - self.spent
    }

    pub fn purchased(&self) -> impl Iterator<Item = &str> {
        self.purchased.iter().map(|(i, _)| i.as_str())
    }
}
