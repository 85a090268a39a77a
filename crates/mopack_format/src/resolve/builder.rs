use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;

use mopack_utils::TypeIdMap;

use crate::formatter::{Decode, Encode, Formatter};
use crate::impls::native_formatter;
use crate::resolve::strategy::{
    AnyFallbackStrategy, ContainerStrategy, EnumStrategy, ObjectStrategy, OverrideStrategy,
    ResolveStrategy, ScalarStrategy, UnionStrategy,
};
use crate::resolve::{ConfigError, Resolver};

// -----------------------------------------------------------------------------
// ResolverBuilder

/// Configures and produces a [`Resolver`].
///
/// All mutation happens here; [`build`](ResolverBuilder::build) consumes the
/// builder and the resulting resolver is immutable. A resolver can therefore
/// never observe a configuration change after its first lookup.
///
/// ```
/// use mopack_format::resolve::ResolverBuilder;
///
/// let mut builder = ResolverBuilder::standard();
/// builder.register::<u32>();
/// let resolver = builder.build();
///
/// assert!(resolver.formatter_of::<u32>().is_ok());
/// ```
pub struct ResolverBuilder {
    chain: Vec<Box<dyn ResolveStrategy>>,
    overrides: TypeIdMap<&'static Formatter>,
    seeds: Vec<(TypeId, &'static Formatter)>,
    auto_register_available: bool,
}

impl ResolverBuilder {
    /// Creates a builder with an empty strategy chain.
    ///
    /// Resolution through a resolver built from this fails for everything
    /// except registered overrides until strategies are pushed.
    pub fn new() -> Self {
        ResolverBuilder {
            chain: Vec::new(),
            overrides: TypeIdMap::new(),
            seeds: Vec::new(),
            auto_register_available: false,
        }
    }

    /// Creates a builder preloaded with the standard strategy chain:
    /// scalars, enums, containers, unions, objects, then the any-kind
    /// fallback. Overrides always sit in front of the chain.
    pub fn standard() -> Self {
        let mut builder = Self::new();
        builder
            .push_strategy(ScalarStrategy)
            .push_strategy(EnumStrategy)
            .push_strategy(ContainerStrategy)
            .push_strategy(UnionStrategy)
            .push_strategy(ObjectStrategy)
            .push_strategy(AnyFallbackStrategy);
        builder
    }

    /// Appends a strategy to the end of the chain.
    pub fn push_strategy(&mut self, strategy: impl ResolveStrategy + 'static) -> &mut Self {
        self.chain.push(Box::new(strategy));
        self
    }

    /// Registers `T`, seeding its canonical formatter into the resolver
    /// cache so the first lookup is already warm.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Encode + Decode + Send + Sync,
    {
        self.seeds.push((TypeId::of::<T>(), native_formatter::<T>()));
        self
    }

    /// Registers a formatter that replaces the usual one for its type.
    ///
    /// The formatter applies to the type of its descriptor. Registering a
    /// second override for the same type is rejected.
    pub fn register_override(&mut self, formatter: Formatter) -> Result<&mut Self, ConfigError> {
        let type_id = formatter.descriptor().ty().id();
        let type_name = formatter.descriptor().name();
        if self.overrides.try_insert(type_id, || Box::leak(Box::new(formatter))) {
            Ok(self)
        } else {
            Err(ConfigError { type_name })
        }
    }

    /// Consumes the builder and produces the immutable resolver.
    pub fn build(self) -> Resolver {
        let mut chain: Vec<Box<dyn ResolveStrategy>> = Vec::with_capacity(self.chain.len() + 1);
        chain.push(Box::new(OverrideStrategy::new(self.overrides)));
        chain.extend(self.chain);

        let mut cache = TypeIdMap::new();
        for (type_id, formatter) in self.seeds {
            cache.insert(type_id, formatter);
        }
        Resolver::from_parts(chain.into_boxed_slice(), cache)
    }

    crate::cfg::auto_register! {
        /// Runs every auto-registration hook linked into this binary.
        ///
        /// Derived types annotated with `#[pack(auto_register)]` submit a
        /// hook that calls [`register`](ResolverBuilder::register) for them.
        /// Returns `false` when the hook inventory was stripped from the
        /// build, meaning nothing was registered.
        pub fn auto_register(&mut self) -> bool {
            self.auto_register_available = false;
            crate::__macro_exports::auto_register::__register_types(self);
            self.auto_register_available
        }

        #[doc(hidden)]
        pub fn mark_auto_register_available(&mut self) {
            self.auto_register_available = true;
        }
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
