// Binds template placeholders to members of an argument shape

use crate::error::{Result, TemplateError};
use crate::shape::{Def, IterFn, Member, ReadFn, RenderFn, Shape};

use super::token::{Kind, ParsedTemplate, Placeholder, Segment};

/// One template segment after resolution against a shape
pub(crate) enum Binding<'t> {
    Literal(&'t str),
    Placeholder(BoundAccessor<'t>),
}

/// How to get from an instance of the shape to a placeholder's value
pub(crate) struct BoundAccessor<'t> {
    pub token: &'t Placeholder,
    /// Member reads and indirection peels, applied in order
    pub steps: Vec<ReadFn>,
    pub leaf: Leaf,
}

pub(crate) enum Leaf {
    Scalar {
        value_type: String,
        render: RenderFn,
    },
    Sequence {
        iter: IterFn,
        /// Peels applied to each element before rendering it
        element_steps: Vec<ReadFn>,
        value_type: String,
        render: RenderFn,
    },
}

/// Resolve every placeholder of `template` against `shape`.
///
/// Purely structural: the result depends only on the template and the shape,
/// never on an instance.
pub(crate) fn resolve<'t>(template: &'t ParsedTemplate, shape: &Shape) -> Result<Vec<Binding<'t>>> {
    let (root, root_steps) = shape.peel();

    template
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => Ok(Binding::Literal(text.as_str())),
            Segment::Placeholder(token) => {
                resolve_token(token, &root, &root_steps).map(Binding::Placeholder)
            }
        })
        .collect()
}

fn find_member<'s>(shape: &'s Shape, name: &str) -> Result<&'s Member> {
    shape
        .member(name)
        .ok_or_else(|| TemplateError::MemberNotFound {
            member: name.to_string(),
            shape: shape.display_name(),
        })
}

fn resolve_token<'t>(
    token: &'t Placeholder,
    root: &Shape,
    root_steps: &[ReadFn],
) -> Result<BoundAccessor<'t>> {
    let mut steps = root_steps.to_vec();

    let outer = find_member(root, token.name())?;
    steps.push(outer.getter());
    let (mut declared, peel) = outer.shape().peel();
    steps.extend(peel);

    if let Some(sub_name) = token.sub_name() {
        let inner = *find_member(&declared, sub_name)?;
        steps.push(inner.getter());
        let (inner_declared, peel) = inner.shape().peel();
        steps.extend(peel);
        declared = inner_declared;
    }

    let leaf = match (token.kind(), declared.def()) {
        (Kind::Single, Def::Scalar(render)) => Leaf::Scalar {
            value_type: declared.display_name(),
            render: *render,
        },
        (Kind::Single, _) => {
            return Err(TemplateError::NotRenderable {
                member: token.path(),
                shape: declared.display_name(),
            })
        }
        (Kind::Collection, Def::Sequence { element, iter }) => {
            let (element, element_steps) = element().peel();
            match element.def() {
                Def::Scalar(render) => Leaf::Sequence {
                    iter: *iter,
                    element_steps,
                    value_type: element.display_name(),
                    render: *render,
                },
                _ => {
                    return Err(TemplateError::NotRenderable {
                        member: token.path(),
                        shape: element.display_name(),
                    })
                }
            }
        }
        (Kind::Collection, _) => {
            return Err(TemplateError::NotIterable {
                member: token.path(),
                shape: root.display_name(),
            })
        }
    };

    Ok(BoundAccessor { token, steps, leaf })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Bindable;
    use crate::template::TemplateParser;

    struct Owner {
        id: u32,
        aliases: Vec<String>,
    }

    struct Repo {
        name: String,
        owner: Option<Owner>,
        stars: Vec<u32>,
    }

    crate::bindable! { Owner { id: u32, aliases: Vec<String> } }
    crate::bindable! { Repo { name: String, owner: Option<Owner>, stars: Vec<u32> } }

    fn resolve_str(template: &str) -> Result<usize> {
        let parsed = TemplateParser::parse(template).unwrap();
        let bindings = resolve(&parsed, &Repo::shape())?;
        Ok(bindings.len())
    }

    #[test]
    fn test_resolve_literal_and_member() {
        assert_eq!(resolve_str("/repos/{name}").unwrap(), 2);
    }

    #[test]
    fn test_resolve_nested_through_option() {
        let parsed = TemplateParser::parse("{owner.id}").unwrap();
        let bindings = resolve(&parsed, &Repo::shape()).unwrap();
        match &bindings[0] {
            Binding::Placeholder(accessor) => {
                // owner getter, Option peel, id getter
                assert_eq!(accessor.steps.len(), 3);
                assert!(matches!(accessor.leaf, Leaf::Scalar { ref value_type, .. } if value_type == "u32"));
            }
            Binding::Literal(_) => panic!("Expected placeholder"),
        }
    }

    #[test]
    fn test_resolve_missing_member() {
        let err = resolve_str("/{nope}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::MemberNotFound {
                member: "nope".to_string(),
                shape: "Repo".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_missing_sub_member_names_declared_type() {
        let err = resolve_str("/{owner.login}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::MemberNotFound {
                member: "login".to_string(),
                shape: "Owner".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_sub_member_on_scalar() {
        let err = resolve_str("/{name.len}").unwrap_err();
        assert!(matches!(err, TemplateError::MemberNotFound { ref shape, .. } if shape == "String"));
    }

    #[test]
    fn test_resolve_collection_on_scalar_fails() {
        let err = resolve_str("/{name[]}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::NotIterable {
                member: "name".to_string(),
                shape: "Repo".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_single_on_sequence_fails() {
        let err = resolve_str("/{stars}").unwrap_err();
        assert!(matches!(err, TemplateError::NotRenderable { .. }));
    }

    #[test]
    fn test_resolve_single_on_record_fails() {
        let err = resolve_str("/{owner}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::NotRenderable {
                member: "owner".to_string(),
                shape: "Owner".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_collection() {
        assert_eq!(resolve_str("/{stars[]}").unwrap(), 2);
    }

    #[test]
    fn test_resolve_against_scalar_root() {
        let parsed = TemplateParser::parse("/static").unwrap();
        assert!(resolve(&parsed, &u32::shape()).is_ok());

        let parsed = TemplateParser::parse("/{id}").unwrap();
        assert!(matches!(
            resolve(&parsed, &u32::shape()),
            Err(TemplateError::MemberNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_through_optional_root() {
        let parsed = TemplateParser::parse("/{name}").unwrap();
        let bindings = resolve(&parsed, &Option::<Repo>::shape()).unwrap();
        match &bindings[1] {
            Binding::Placeholder(accessor) => assert_eq!(accessor.steps.len(), 2),
            Binding::Literal(_) => panic!("Expected placeholder"),
        }
    }
}
