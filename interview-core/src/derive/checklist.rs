//! Grouping and completion over walked checklist items.

use crate::types::{Category, ChecklistItem};
use serde::Serialize;
use std::collections::BTreeSet;

/// Items of one category, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub items: Vec<ChecklistItem>,
    /// At least one item carries a non-empty answer
    pub complete: bool,
}

/// Grouped checklist with completion flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Checklist {
    /// Groups in first-seen category order
    pub groups: Vec<CategoryGroup>,
    /// Completed categories in canonical order
    pub completed_categories: Vec<Category>,
    /// Every known category is complete
    pub is_complete: bool,
}

/// "Step N of 8" indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current_step: usize,
    pub total_steps: usize,
    pub percent: u8,
}

impl Checklist {
    /// Group `items` by category and compute completion.
    pub fn aggregate(items: Vec<ChecklistItem>) -> Self {
        let mut groups: Vec<CategoryGroup> = Vec::new();

        for item in items {
            match groups.iter_mut().find(|g| g.category == item.category) {
                Some(group) => group.items.push(item),
                None => groups.push(CategoryGroup {
                    category: item.category,
                    items: vec![item],
                    complete: false,
                }),
            }
        }

        for group in &mut groups {
            group.complete = group.items.iter().any(ChecklistItem::is_answered);
        }

        let completed: BTreeSet<Category> = groups
            .iter()
            .filter(|g| g.complete)
            .map(|g| g.category)
            .collect();
        let all: BTreeSet<Category> = Category::ALL.into_iter().collect();

        Self {
            is_complete: completed == all,
            // BTreeSet iterates in declaration order, which is the canonical order
            completed_categories: completed.into_iter().collect(),
            groups,
        }
    }

    /// Group for `category`, if any question in it has been asked.
    pub fn group(&self, category: Category) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    pub fn is_category_complete(&self, category: Category) -> bool {
        self.completed_categories.contains(&category)
    }

    /// All items, grouped order.
    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Current step is one past the completed count, capped at the total.
    pub fn progress(&self) -> Progress {
        let total_steps = Category::ALL.len();
        let current_step = (self.completed_categories.len() + 1).min(total_steps);
        let percent = (current_step as f64 / total_steps as f64 * 100.0).round() as u8;
        Progress {
            current_step,
            total_steps,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: Category, answer: Option<&str>) -> ChecklistItem {
        ChecklistItem {
            id: id.to_string(),
            category,
            question: format!("Question {id}"),
            explanation: "Why".to_string(),
            priority: None,
            answer: answer.map(str::to_string),
        }
    }

    #[test]
    fn test_groups_preserve_first_seen_order() {
        let checklist = Checklist::aggregate(vec![
            item("q1", Category::PropertyType, None),
            item("q2", Category::BudgetFees, None),
            item("q3", Category::PropertyType, None),
        ]);

        let categories: Vec<_> = checklist.groups.iter().map(|g| g.category).collect();
        assert_eq!(categories, vec![Category::PropertyType, Category::BudgetFees]);
        let ids: Vec<_> = checklist.items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q3", "q2"]);
    }

    #[test]
    fn test_category_complete_with_one_answer() {
        let checklist = Checklist::aggregate(vec![
            item("q1", Category::BudgetFees, None),
            item("q2", Category::BudgetFees, Some("600k")),
            item("q3", Category::LocalKnowledge, Some("")),
        ]);

        assert!(checklist.is_category_complete(Category::BudgetFees));
        assert!(!checklist.is_category_complete(Category::LocalKnowledge));
        assert!(checklist.group(Category::BudgetFees).unwrap().complete);
        assert!(!checklist.is_complete);
    }

    #[test]
    fn test_completed_categories_use_canonical_order() {
        let checklist = Checklist::aggregate(vec![
            item("q1", Category::LifestyleCulturalFit, Some("Quiet")),
            item("q2", Category::AgentRelationship, Some("No agent yet")),
        ]);
        assert_eq!(
            checklist.completed_categories,
            vec![Category::AgentRelationship, Category::LifestyleCulturalFit]
        );
    }

    #[test]
    fn test_all_categories_answered_is_complete() {
        let items = Category::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| item(&format!("q{i}"), *c, Some("yes")))
            .collect();
        let checklist = Checklist::aggregate(items);
        assert!(checklist.is_complete);
        assert_eq!(checklist.progress().current_step, 8);
        assert_eq!(checklist.progress().percent, 100);
    }

    #[test]
    fn test_progress_counts_completed_categories() {
        let empty = Checklist::aggregate(vec![]);
        assert!(empty.is_empty());
        assert_eq!(
            empty.progress(),
            Progress {
                current_step: 1,
                total_steps: 8,
                percent: 13
            }
        );

        let one = Checklist::aggregate(vec![item("q1", Category::BudgetFees, Some("ok"))]);
        assert_eq!(one.progress().current_step, 2);
        assert_eq!(one.progress().percent, 25);
    }
}
