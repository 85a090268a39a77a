macro_rules! impl_scalar_described {
    ($ty:ty, $kind:ident) => {
        impl $crate::info::Described for $ty {
            fn descriptor() -> &'static $crate::info::TypeDescriptor {
                static CELL: $crate::impls::NonGenericDescriptorCell =
                    $crate::impls::NonGenericDescriptorCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeDescriptor::Scalar(
                        $crate::info::ScalarDescriptor::new::<$ty>(
                            ::core::stringify!($ty),
                            $crate::info::ScalarKind::$kind,
                        )
                        .with_formatter($crate::impls::native_formatter::<$ty>),
                    )
                })
            }
        }
    };
}

pub(crate) use impl_scalar_described;
