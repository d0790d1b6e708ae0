//! Runtime type descriptors

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::Reflect;

/// Structural category of a described type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Uintptr,
    Float,
    Char,
    String,
    Array,
    Slice,
    Map,
    Chan,
    Func,
    Interface,
    Pointer,
    Struct,
    UnsafePointer,
}

/// Describes one field of a struct type
#[derive(Clone)]
pub struct FieldInfo {
    name: &'static str,
    type_info: Option<fn() -> TypeInfo>,
}

impl FieldInfo {
    /// A field filled through the resolver.
    pub fn public<T: Reflect + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            type_info: Some(T::type_info),
        }
    }

    /// A field left at its default value. Its type is not described.
    pub fn private(name: &'static str) -> Self {
        Self {
            name,
            type_info: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Public fields are filled through the resolver by a struct's default
    /// factory; private fields are left at their default value.
    pub fn is_public(&self) -> bool {
        self.type_info.is_some()
    }

    pub fn type_info(&self) -> Option<TypeInfo> {
        self.type_info.map(|type_info| type_info())
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("public", &self.is_public())
            .field("type", &self.type_info())
            .finish()
    }
}

/// A runtime handle to a type.
///
/// Two descriptors are equal exactly when they describe the same type; the
/// name, kind and structure are informational only. Element and field
/// descriptors are computed lazily so recursive types can be described.
#[derive(Clone)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    kind: Kind,
    elem: Option<fn() -> TypeInfo>,
    fields: Arc<[FieldInfo]>,
}

impl TypeInfo {
    /// Describes `T` as a leaf type of the given kind.
    pub fn of<T: ?Sized + 'static>(kind: Kind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind,
            elem: None,
            fields: Arc::from(Vec::new()),
        }
    }

    /// Describes a pointer type whose pointee is described by `elem`.
    pub fn pointer<T: ?Sized + 'static>(elem: fn() -> TypeInfo) -> Self {
        Self::of::<T>(Kind::Pointer).with_elem(elem)
    }

    /// Describes an interface (trait object) type.
    pub fn interface<T: ?Sized + 'static>() -> Self {
        Self::of::<T>(Kind::Interface)
    }

    /// Describes a struct type with the given fields.
    pub fn structure<T: ?Sized + 'static>(fields: Vec<FieldInfo>) -> Self {
        Self {
            fields: Arc::from(fields),
            ..Self::of::<T>(Kind::Struct)
        }
    }

    /// Attaches an element descriptor (array, slice, map value, channel or
    /// pointer element).
    pub fn with_elem(mut self, elem: fn() -> TypeInfo) -> Self {
        self.elem = Some(elem);
        self
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn elem(&self) -> Option<TypeInfo> {
        self.elem.map(|elem| elem())
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Whether values of this type can exist (everything but interfaces).
    pub fn is_concrete(&self) -> bool {
        self.kind != Kind::Interface
    }

    /// Whether copies of a value share the same underlying state. Only
    /// sharable types may be cached with a scoped or singleton lifetime.
    pub fn is_sharable(&self) -> bool {
        matches!(self.kind, Kind::Pointer | Kind::Chan)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.name, self.kind)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
