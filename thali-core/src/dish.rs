use crate::error::ParseEnumError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Declares a closed set of catalog values that travel as fixed strings,
/// both over JSON and in the store's text columns.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Case-insensitive lookup that tolerates surrounding whitespace.
            pub fn parse_loose(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(value))
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Whether a dish contains meat or fish.
    Diet("diet") {
        Vegetarian => "vegetarian",
        NonVegetarian => "non-vegetarian",
    }
}

string_enum! {
    Course("course") {
        MainCourse => "main course",
        Dessert => "dessert",
        Snack => "snack",
        Starter => "starter",
    }
}

string_enum! {
    FlavorProfile("flavor profile") {
        Sweet => "sweet",
        Spicy => "spicy",
        Bitter => "bitter",
        Sour => "sour",
    }
}

string_enum! {
    /// Broad geographic region a dish comes from.
    Region("region") {
        North => "North",
        South => "South",
        East => "East",
        West => "West",
        NorthEast => "North East",
        Central => "Central",
    }
}

/// A catalog record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    /// Ingredient names in their stored casing and order
    pub ingredients: Vec<String>,
    pub diet: Diet,
    /// Minutes; absent when unknown
    pub prep_time: Option<u32>,
    /// Minutes; absent when unknown
    pub cook_time: Option<u32>,
    pub flavor_profile: Option<FlavorProfile>,
    pub course: Course,
    pub state: Option<String>,
    pub region: Option<Region>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A dish that has not been stored yet. Produced by the CSV importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDish {
    pub name: String,
    pub ingredients: Vec<String>,
    pub diet: Diet,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub flavor_profile: Option<FlavorProfile>,
    pub course: Course,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub region: Option<Region>,
}

impl NewDish {
    /// Create a minimal dish, mostly useful in tests.
    pub fn new(name: impl Into<String>, ingredients: &[&str]) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
            diet: Diet::Vegetarian,
            prep_time: None,
            cook_time: None,
            flavor_profile: None,
            course: Course::MainCourse,
            state: None,
            region: None,
        }
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.course = course;
        self
    }

    pub fn with_diet(mut self, diet: Diet) -> Self {
        self.diet = diet;
        self
    }

    pub fn with_flavor(mut self, flavor: FlavorProfile) -> Self {
        self.flavor_profile = Some(flavor);
        self
    }

    pub fn with_times(mut self, prep_time: Option<u32>, cook_time: Option<u32>) -> Self {
        self.prep_time = prep_time;
        self.cook_time = cook_time;
        self
    }

    pub fn with_origin(mut self, state: Option<&str>, region: Option<Region>) -> Self {
        self.state = state.map(str::to_string);
        self.region = region;
        self
    }

    /// Attach store-assigned fields.
    pub fn into_dish(self, id: Uuid, now: DateTime<Utc>) -> Dish {
        Dish {
            id,
            name: self.name,
            ingredients: self.ingredients,
            diet: self.diet,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            flavor_profile: self.flavor_profile,
            course: self.course,
            state: self.state,
            region: self.region,
            created_at: now,
            updated_at: now,
        }
    }
}
