// Common fixtures shared across test files

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};

use uri_bind::bindable;
use uri_bind::shape::{Bindable, Member, Shape};
use uri_bind::FormatValue;

#[allow(dead_code)]
pub struct Owner {
    pub id: u64,
    pub login: String,
}

#[allow(dead_code)]
pub struct Repo {
    pub owner: Option<Owner>,
    pub name: String,
    pub topics: Vec<String>,
}

#[allow(dead_code)]
pub struct User {
    pub id: u64,
    pub tags: Vec<String>,
}

#[allow(dead_code)]
pub struct Numbers {
    pub ids: Vec<u32>,
    pub maybe: Option<Vec<u32>>,
    pub sparse: Vec<Option<u32>>,
}

/// A value whose string form depends on the format specifier
#[allow(dead_code)]
pub struct Shout(pub String);

impl FormatValue for Shout {
    fn to_uri_string(&self) -> String {
        self.0.clone()
    }

    fn format_with(&self, spec: &str) -> Result<String, String> {
        match spec {
            "upper" => Ok(self.0.to_uppercase()),
            "lower" => Ok(self.0.to_lowercase()),
            other => Err(format!("unknown case '{}'", other)),
        }
    }
}

#[allow(dead_code)]
pub struct Search {
    pub q: Shout,
}

#[allow(dead_code)]
pub struct Paged {
    pub q: Shout,
    pub page: Option<u32>,
}

#[allow(dead_code)]
pub struct Measure {
    pub x: f64,
}

bindable! { Paged { q: Shout, page: Option<u32> } }
bindable! { Measure { x: f64 } }
bindable! { Owner { id: u64, login: String } }
bindable! { Repo { owner: Option<Owner>, name: String, topics: Vec<String> } }
bindable! { User { id: u64, tags: Vec<String> } }
bindable! { Numbers { ids: Vec<u32>, maybe: Option<Vec<u32>>, sparse: Vec<Option<u32>> } }
bindable!(scalar Shout);
bindable! { Search { q: Shout } }

#[allow(dead_code)]
pub fn repo(owner: Option<u64>) -> Repo {
    Repo {
        owner: owner.map(|id| Owner {
            id,
            login: format!("user{}", id),
        }),
        name: "uri bind".to_string(),
        topics: vec!["rust".to_string(), "uri".to_string()],
    }
}

/// Counts how often its shape is requested, i.e. how often it is resolved
#[allow(dead_code)]
pub struct Counted {
    pub id: u32,
}

#[allow(dead_code)]
pub static COUNTED_RESOLUTIONS: AtomicUsize = AtomicUsize::new(0);

impl Bindable for Counted {
    fn shape() -> Shape {
        COUNTED_RESOLUTIONS.fetch_add(1, Ordering::SeqCst);
        Shape::record(
            "Counted",
            vec![Member::new("id", <u32 as Bindable>::shape, read_counted_id)],
        )
    }
}

fn read_counted_id(value: &dyn Any) -> Option<&dyn Any> {
    let counted = value.downcast_ref::<Counted>()?;
    let id: &u32 = &counted.id;
    Some(id)
}

#[allow(dead_code)]
pub fn counted_resolutions() -> usize {
    COUNTED_RESOLUTIONS.load(Ordering::SeqCst)
}
