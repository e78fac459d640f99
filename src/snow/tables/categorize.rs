use crate::snow::tables::config::CategoryMap;

/// Tables assigned to one category, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTables {
    pub category: String,
    pub tables: Vec<String>,
}

/// Assigns discovered tables to categories.
///
/// Every category is returned, in category file order, even when no table
/// matches it. A table listed by several categories joins the first one; a
/// table listed by none is dropped.
pub fn categorize<S: AsRef<str>>(tables: &[S], categories: &CategoryMap) -> Vec<CategoryTables> {
    let mut grouped: Vec<CategoryTables> = categories
        .iter()
        .map(|category| CategoryTables {
            category: category.name.clone(),
            tables: Vec::new(),
        })
        .collect();

    for table in tables {
        let table = table.as_ref();
        let position = categories
            .iter()
            .position(|category| category.tables.iter().any(|listed| listed == table));
        if let Some(position) = position {
            grouped[position].tables.push(table.to_string());
        }
    }

    grouped
}
