//! Ordinal categories for procedure codes.

use std::collections::BTreeSet;

use medmap_model::{CategoryAssignment, CategoryOptions, CategoryWhitelist, OTHERS_CATEGORY};

/// Assign a category and ordinal to every observed procedure code.
///
/// Whitelisted codes are their own category and are numbered 1, 2, 3, ... in
/// ascending lexicographic order. Every other code falls into
/// [`OTHERS_CATEGORY`], and all of them share one ordinal: the number of
/// whitelisted rows plus one. Whitelisted rows come first, followed by the
/// "Others" rows in the order the codes were first observed.
///
/// Observed values are trimmed; blanks and repeats are ignored. With
/// `include_unobserved_whitelist` every whitelist entry gets a row even if the
/// batch never used it.
///
/// ```
/// use medmap_model::{CategoryOptions, CategoryWhitelist};
/// use medmap_transform::assign_categories;
///
/// let whitelist = CategoryWhitelist::parse("X,Y,Z").unwrap();
/// let table = assign_categories(&whitelist, ["Z", "Q", "X", "R"], CategoryOptions::default());
/// let orders: Vec<(&str, u32)> = table.iter().map(|a| (a.code.as_str(), a.order)).collect();
/// assert_eq!(orders, vec![("X", 1), ("Z", 2), ("Q", 3), ("R", 3)]);
/// ```
pub fn assign_categories<I, S>(
    whitelist: &CategoryWhitelist,
    observed: I,
    options: CategoryOptions,
) -> Vec<CategoryAssignment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut listed: BTreeSet<String> = BTreeSet::new();
    if options.include_unobserved_whitelist {
        listed.extend(whitelist.codes().iter().cloned());
    }
    let mut others: Vec<String> = Vec::new();
    for value in observed {
        let code = value.as_ref().trim();
        if code.is_empty() {
            continue;
        }
        if whitelist.contains(code) {
            listed.insert(code.to_string());
        } else if !others.iter().any(|seen| seen == code) {
            others.push(code.to_string());
        }
    }

    let mut assignments = Vec::with_capacity(listed.len() + others.len());
    for (idx, code) in listed.into_iter().enumerate() {
        assignments.push(CategoryAssignment {
            category: code.clone(),
            code,
            order: ordinal(idx + 1),
        });
    }
    let others_order = ordinal(assignments.len() + 1);
    for code in others {
        assignments.push(CategoryAssignment {
            code,
            category: OTHERS_CATEGORY.to_string(),
            order: others_order,
        });
    }
    assignments
}

fn ordinal(position: usize) -> u32 {
    u32::try_from(position).unwrap_or(u32::MAX)
}
