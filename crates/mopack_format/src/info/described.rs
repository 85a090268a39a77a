use core::any::Any;

use crate::info::TypeDescriptor;

/// A type with a canonical static descriptor.
///
/// [`derive(Pack)`](mopack_format_derive::Pack) implements this alongside the
/// codec traits. Manual implementations publish their descriptor through a
/// cell so construction runs at most once:
///
/// ```
/// use mopack_format::impls::NonGenericDescriptorCell;
/// use mopack_format::info::{Described, ScalarDescriptor, ScalarKind, TypeDescriptor};
///
/// struct Meters(f64);
///
/// impl Described for Meters {
///     fn descriptor() -> &'static TypeDescriptor {
///         static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
///         CELL.get_or_init(|| {
///             TypeDescriptor::Scalar(ScalarDescriptor::new::<Meters>("Meters", ScalarKind::F64))
///         })
///     }
/// }
///
/// assert_eq!(Meters::descriptor().name(), "Meters");
/// ```
pub trait Described: Any {
    /// The descriptor shared by all instances of `Self`.
    fn descriptor() -> &'static TypeDescriptor;
}
