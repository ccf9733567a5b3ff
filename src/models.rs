use std::fmt;

/// The fixed set of transaction categories. The storage tool surfaces these
/// to the model as an enum in its argument schema; the table itself stores
/// the label as plain text and does not enforce membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Clothes,
    EatingOut,
    Entertainment,
    Fuel,
    General,
    Gifts,
    Holidays,
    Kids,
    Shopping,
    Sports,
    Travel,
    Salary,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Clothes,
        Category::EatingOut,
        Category::Entertainment,
        Category::Fuel,
        Category::General,
        Category::Gifts,
        Category::Holidays,
        Category::Kids,
        Category::Shopping,
        Category::Sports,
        Category::Travel,
        Category::Salary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothes => "Clothes",
            Category::EatingOut => "Eating Out",
            Category::Entertainment => "Entertainment",
            Category::Fuel => "Fuel",
            Category::General => "General",
            Category::Gifts => "Gifts",
            Category::Holidays => "Holidays",
            Category::Kids => "Kids",
            Category::Shopping => "Shopping",
            Category::Sports => "Sports",
            Category::Travel => "Travel",
            Category::Salary => "Salary",
        }
    }

    /// All labels, for prompt text and tool schemas.
    pub fn labels() -> Vec<&'static str> {
        Category::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
