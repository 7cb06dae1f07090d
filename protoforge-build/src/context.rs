//! Shared state for a generation run: the type registry, schema validation,
//! global alias computation, and recursion detection.

use std::collections::{BTreeMap, HashMap, HashSet};

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::config::Config;
use crate::schema::{Cardinality, Field, FieldGroup, FieldType, Module, ModuleSet, TypeRef};
use crate::Error;

const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Enum,
    Message,
}

impl TypeKind {
    fn describe(self) -> &'static str {
        match self {
            TypeKind::Enum => "an enum",
            TypeKind::Message => "a message",
        }
    }
}

#[derive(Debug)]
pub struct GenerationContext<'a> {
    pub config: &'a Config,
    /// (module, name) -> kind, for every declared type.
    types: HashMap<(String, String), TypeKind>,
    /// name -> owning module for names unique across the set, `None` when
    /// the name is ambiguous and the alias is suppressed.
    aliases: BTreeMap<String, Option<String>>,
    /// (module, message, field) triples that need a `Box` to break a
    /// reference cycle.
    boxed_fields: HashSet<(String, String, String)>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(config: &'a Config, set: &ModuleSet) -> Result<Self, Error> {
        let mut types = HashMap::new();
        let mut module_names = HashSet::new();
        for module in &set.modules {
            if !module_names.insert(module.name.clone()) {
                return Err(Error::DuplicateModule {
                    module: module.name.clone(),
                });
            }
            for enum_type in &module.enums {
                if types
                    .insert((module.name.clone(), enum_type.name.clone()), TypeKind::Enum)
                    .is_some()
                {
                    return Err(Error::DuplicateTypeName {
                        module: module.name.clone(),
                        name: enum_type.name.clone(),
                    });
                }
            }
            for message in &module.messages {
                if types
                    .insert((module.name.clone(), message.name.clone()), TypeKind::Message)
                    .is_some()
                {
                    return Err(Error::DuplicateTypeName {
                        module: module.name.clone(),
                        name: message.name.clone(),
                    });
                }
            }
        }

        let ctx = GenerationContext {
            config,
            types,
            aliases: compute_aliases(set),
            boxed_fields: find_boxed_fields(set),
        };

        for module in &set.modules {
            ctx.validate_module(module)?;
        }

        Ok(ctx)
    }

    /// Resolve a type reference to a Rust path relative to
    /// `referrer_module`, checking the referenced entity's kind.
    pub fn resolve(
        &self,
        referrer_module: &str,
        referrer: &str,
        type_ref: &TypeRef,
        expected: TypeKind,
    ) -> Result<TokenStream, Error> {
        let kind = self
            .types
            .get(&(type_ref.module.clone(), type_ref.name.clone()))
            .copied()
            .ok_or_else(|| Error::UnresolvedTypeRef {
                referrer: referrer.to_owned(),
                module: type_ref.module.clone(),
                name: type_ref.name.clone(),
            })?;
        if kind != expected {
            return Err(Error::TypeRefKind {
                referrer: referrer.to_owned(),
                module: type_ref.module.clone(),
                name: type_ref.name.clone(),
                expected: expected.describe(),
            });
        }

        let name = format_ident!("{}", type_ref.name);
        if type_ref.module == referrer_module {
            Ok(quote!(#name))
        } else {
            let module = format_ident!("{}", type_ref.module);
            Ok(quote!(super::#module::#name))
        }
    }

    pub fn is_boxed(&self, module: &str, message: &str, field: &str) -> bool {
        self.boxed_fields
            .contains(&(module.to_owned(), message.to_owned(), field.to_owned()))
    }

    /// Unique-name aliases: (type name, owning module), sorted by name.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .filter_map(|(name, module)| Some((name.as_str(), module.as_deref()?)))
    }

    /// Names declared in more than one module, for which no alias is
    /// emitted.
    pub fn suppressed_aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases
            .iter()
            .filter(|(_, module)| module.is_none())
            .map(|(name, _)| name.as_str())
    }

    fn validate_module(&self, module: &Module) -> Result<(), Error> {
        for enum_type in &module.enums {
            validate_enum(enum_type)?;
        }
        for message in &module.messages {
            self.validate_message(module, message)?;
        }
        Ok(())
    }

    fn validate_message(
        &self,
        module: &Module,
        message: &crate::schema::Message,
    ) -> Result<(), Error> {
        let mut numbers = HashSet::new();
        for group in &message.groups {
            if let FieldGroup::Oneof { name, fields, .. } = group {
                if fields.is_empty() {
                    return Err(Error::EmptyOneof {
                        message: message.name.clone(),
                        group: name.clone(),
                    });
                }
                for field in fields {
                    let map_member = matches!(field.ty, FieldType::Map { .. });
                    if field.cardinality != Cardinality::Singular || map_member {
                        return Err(Error::OneofFieldShape {
                            message: message.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                }
            }

            for field in group.fields() {
                self.validate_field(module, message, field)?;
                if !(1..=MAX_FIELD_NUMBER).contains(&field.number) {
                    return Err(Error::FieldNumberOutOfRange {
                        message: message.name.clone(),
                        field: field.name.clone(),
                        number: field.number,
                    });
                }
                if !numbers.insert(field.number) {
                    return Err(Error::DuplicateFieldNumber {
                        message: message.name.clone(),
                        number: field.number,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_field(
        &self,
        module: &Module,
        message: &crate::schema::Message,
        field: &Field,
    ) -> Result<(), Error> {
        let referrer = format!("{}.{}", message.name, field.name);
        match &field.ty {
            FieldType::Enum(type_ref) => {
                self.resolve(&module.name, &referrer, type_ref, TypeKind::Enum)?;
            }
            FieldType::Message(type_ref) => {
                self.resolve(&module.name, &referrer, type_ref, TypeKind::Message)?;
            }
            FieldType::Map { value, .. } => {
                if field.cardinality != Cardinality::Singular {
                    return Err(Error::MapFieldCardinality {
                        message: message.name.clone(),
                        field: field.name.clone(),
                    });
                }
                match value.as_ref() {
                    FieldType::Map { .. } => {
                        return Err(Error::NestedMap {
                            message: message.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                    FieldType::Enum(type_ref) => {
                        self.resolve(&module.name, &referrer, type_ref, TypeKind::Enum)?;
                    }
                    FieldType::Message(type_ref) => {
                        self.resolve(&module.name, &referrer, type_ref, TypeKind::Message)?;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn validate_enum(enum_type: &crate::schema::Enum) -> Result<(), Error> {
    if enum_type.members.is_empty() {
        return Err(Error::EmptyEnum {
            enum_name: enum_type.name.clone(),
        });
    }
    let mut names = HashSet::new();
    let mut numbers = HashSet::new();
    for (name, number) in &enum_type.members {
        if !names.insert(name.clone()) {
            return Err(Error::DuplicateEnumMember {
                enum_name: enum_type.name.clone(),
                member: name.clone(),
            });
        }
        if !numbers.insert(*number) {
            return Err(Error::DuplicateEnumMember {
                enum_name: enum_type.name.clone(),
                member: name.clone(),
            });
        }
    }
    if !numbers.contains(&0) {
        return Err(Error::MissingEnumZero {
            enum_name: enum_type.name.clone(),
        });
    }
    Ok(())
}

/// Names that are unique across the whole set get an unqualified alias in
/// the generated `mod.rs`; ambiguous names are suppressed.
fn compute_aliases(set: &ModuleSet) -> BTreeMap<String, Option<String>> {
    let mut aliases: BTreeMap<String, Option<String>> = BTreeMap::new();
    for module in &set.modules {
        let names = module
            .enums
            .iter()
            .map(|e| e.name.clone())
            .chain(module.messages.iter().map(|m| m.name.clone()));
        for name in names {
            aliases
                .entry(name)
                .and_modify(|owner| *owner = None)
                .or_insert_with(|| Some(module.name.clone()));
        }
    }
    aliases
}

/// Singular message slots are inline (`Option<M>` still stores `M` by
/// value), so any reference cycle through them needs a `Box`. Repeated and
/// map slots are already indirect through their collections.
fn find_boxed_fields(set: &ModuleSet) -> HashSet<(String, String, String)> {
    // Edges through by-value message slots, keyed by (module, message).
    let mut edges: HashMap<(String, String), Vec<(String, String)>> = HashMap::new();
    for module in &set.modules {
        for message in &module.messages {
            let src = (module.name.clone(), message.name.clone());
            for group in &message.groups {
                for field in group.fields() {
                    if field.cardinality == Cardinality::Repeated {
                        continue;
                    }
                    if let FieldType::Message(type_ref) = &field.ty {
                        edges
                            .entry(src.clone())
                            .or_default()
                            .push((type_ref.module.clone(), type_ref.name.clone()));
                    }
                }
            }
        }
    }

    fn reaches(
        edges: &HashMap<(String, String), Vec<(String, String)>>,
        from: &(String, String),
        to: &(String, String),
        visited: &mut HashSet<(String, String)>,
    ) -> bool {
        if from == to {
            return true;
        }
        if !visited.insert(from.clone()) {
            return false;
        }
        edges
            .get(from)
            .map(|targets| {
                targets
                    .iter()
                    .any(|target| reaches(edges, target, to, visited))
            })
            .unwrap_or(false)
    }

    let mut boxed = HashSet::new();
    for module in &set.modules {
        for message in &module.messages {
            let src = (module.name.clone(), message.name.clone());
            for group in &message.groups {
                for field in group.fields() {
                    if field.cardinality == Cardinality::Repeated {
                        continue;
                    }
                    if let FieldType::Message(type_ref) = &field.ty {
                        let dst = (type_ref.module.clone(), type_ref.name.clone());
                        let mut visited = HashSet::new();
                        if reaches(&edges, &dst, &src, &mut visited) {
                            boxed.insert((
                                module.name.clone(),
                                message.name.clone(),
                                field.name.clone(),
                            ));
                        }
                    }
                }
            }
        }
    }
    boxed
}
