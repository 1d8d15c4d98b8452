use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use uuid::Uuid;

/// 菜单条目 (menu_items)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MenuCatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

/// 已定义配方的菜单条目ID集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeIndex {
    ids: HashSet<Uuid>,
}

impl RecipeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<Uuid> for RecipeIndex {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// 新建菜单条目 (由未知菜品转入)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub category: String,
    pub selling_price: f64,
}
