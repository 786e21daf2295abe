//! Typed model of the core asset document
//!
//! Only the structure the annotator walks is typed. Every other key is kept
//! in a `Map` so it is written back unchanged and in its original order.

use crate::types::{AnnotationReport, IdMismatch, ID_FIELD};
use serde::ser::SerializeMap;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// An entry that carries an injected integer `id`
pub trait Identified {
    fn fields(&self) -> &Map<String, Value>;

    fn fields_mut(&mut self) -> &mut Map<String, Value>;

    fn id(&self) -> Option<&Value> {
        self.fields().get(ID_FIELD)
    }

    /// Set the id, returning true when a different existing id was replaced
    fn assign_id(&mut self, id: u64) -> bool {
        let id = Value::from(id);
        match self.fields_mut().insert(ID_FIELD.to_string(), id.clone()) {
            Some(previous) => previous != id,
            None => false,
        }
    }

    fn check_id(&self, path: String, expected: u64) -> Option<IdMismatch> {
        let found = self.id();
        if found.and_then(Value::as_u64) == Some(expected) {
            return None;
        }
        Some(IdMismatch {
            path,
            expected,
            found: found.cloned(),
        })
    }
}

/// An element of the top-level `attributes` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribute {
    pub fields: Map<String, Value>,
}

/// An element of a category's `lots` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lot {
    pub fields: Map<String, Value>,
}

/// The `lots` key of a category
///
/// `Absent` and `Null` are kept apart so the document is written back
/// exactly as it was read.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Lots {
    #[default]
    Absent,
    Null,
    Present(Vec<Lot>),
}

impl Lots {
    pub fn is_absent(&self) -> bool {
        matches!(self, Lots::Absent)
    }

    pub fn as_slice(&self) -> &[Lot] {
        match self {
            Lots::Present(lots) => lots,
            Lots::Absent | Lots::Null => &[],
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [Lot] {
        match self {
            Lots::Present(lots) => lots,
            Lots::Absent | Lots::Null => &mut [],
        }
    }
}

impl<'de> Deserialize<'de> for Lots {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // A missing key never reaches here, `Category` keeps it as `Absent`
        Ok(match Option::<Vec<Lot>>::deserialize(deserializer)? {
            Some(lots) => Lots::Present(lots),
            None => Lots::Null,
        })
    }
}

impl Serialize for Lots {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Lots::Present(lots) => lots.serialize(serializer),
            Lots::Absent | Lots::Null => serializer.serialize_none(),
        }
    }
}

/// Key of the nested lots array inside a category
const LOTS_FIELD: &str = "lots";

/// An element of the top-level `categories` array
///
/// `lots` is typed while the other keys stay in `fields`. The position of
/// `lots` among the keys is remembered so the category is written back in
/// its original key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub lots: Lots,
    pub fields: Map<String, Value>,
    lots_position: usize,
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let original = Map::<String, Value>::deserialize(deserializer)?;

        let mut category = Category::default();
        for (idx, (key, value)) in original.into_iter().enumerate() {
            if key == LOTS_FIELD {
                category.lots = Lots::deserialize(value).map_err(<D::Error as de::Error>::custom)?;
                category.lots_position = idx;
            } else {
                category.fields.insert(key, value);
            }
        }
        Ok(category)
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let has_lots = !self.lots.is_absent();
        let mut map = serializer.serialize_map(Some(self.fields.len() + usize::from(has_lots)))?;

        for (idx, (key, value)) in self.fields.iter().enumerate() {
            if has_lots && idx == self.lots_position {
                map.serialize_entry(LOTS_FIELD, &self.lots)?;
            }
            map.serialize_entry(key, value)?;
        }
        // `lots` was the last key, or the category was built without fields
        if has_lots && self.lots_position >= self.fields.len() {
            map.serialize_entry(LOTS_FIELD, &self.lots)?;
        }

        map.end()
    }
}

macro_rules! impl_identified {
    ($($ty:ty),*) => {
        $(
            impl Identified for $ty {
                fn fields(&self) -> &Map<String, Value> {
                    &self.fields
                }

                fn fields_mut(&mut self) -> &mut Map<String, Value> {
                    &mut self.fields
                }
            }
        )*
    };
}

impl_identified!(Attribute, Category, Lot);

/// The whole core asset file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetDocument {
    pub attributes: Vec<Attribute>,
    pub categories: Vec<Category>,

    /// Any other top-level keys, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetDocument {
    /// Check the shape of a parsed JSON value and convert it
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Assign positional ids to every attribute, category and lot
    ///
    /// Attributes and categories are numbered by their own position. Lots
    /// share one counter across all categories, so lot ids are unique in the
    /// whole document.
    pub fn annotate(&mut self) -> AnnotationReport {
        let mut report = AnnotationReport::default();

        let mut attr_id = 0;
        for attribute in &mut self.attributes {
            if attribute.assign_id(attr_id) {
                report.reassigned += 1;
            }
            attr_id += 1;
        }
        report.attributes = self.attributes.len();

        let mut cate_id = 0;
        let mut lot_id = 0;
        for category in &mut self.categories {
            if category.assign_id(cate_id) {
                report.reassigned += 1;
            }
            cate_id += 1;

            for lot in category.lots.as_mut_slice() {
                if lot.assign_id(lot_id) {
                    report.reassigned += 1;
                }
                lot_id += 1;
            }
        }
        report.categories = self.categories.len();
        report.lots = lot_id as usize;

        report
    }

    /// List every entry whose id differs from what `annotate` would assign
    pub fn verify(&self) -> Vec<IdMismatch> {
        let mut mismatches = Vec::new();

        for (idx, attribute) in self.attributes.iter().enumerate() {
            mismatches.extend(attribute.check_id(format!("/attributes/{}", idx), idx as u64));
        }

        let mut lot_id = 0;
        for (idx, category) in self.categories.iter().enumerate() {
            mismatches.extend(category.check_id(format!("/categories/{}", idx), idx as u64));

            for (lot_idx, lot) in category.lots.as_slice().iter().enumerate() {
                let path = format!("/categories/{}/lots/{}", idx, lot_idx);
                mismatches.extend(lot.check_id(path, lot_id));
                lot_id += 1;
            }
        }

        mismatches
    }

    /// All lots in category-then-lot order
    pub fn lots(&self) -> impl Iterator<Item = &Lot> {
        self.categories
            .iter()
            .flat_map(|category| category.lots.as_slice())
    }
}
