use crate::impls::{impl_codec_for_hashmap, impl_codec_for_hashset};

// Covers `mopack_utils::HashMap` and `mopack_utils::HashSet`, which are
// seeded aliases of the hashbrown containers.
impl_codec_for_hashset!(::mopack_utils::hash::hashbrown::HashSet<T, S>);
impl_codec_for_hashmap!(::mopack_utils::hash::hashbrown::HashMap<K, V, S>);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use mopack_utils::hash::HashMap;

    use crate::resolve;

    #[test]
    fn seeded_maps_round_trip() {
        let resolver = resolve::Resolver::standard();
        let mut map = HashMap::default();
        map.insert(3_u16, String::from("three"));

        let bytes = resolve::serialize(&map, &resolver).unwrap();
        let back: HashMap<u16, String> = resolve::deserialize(&bytes, &resolver).unwrap();
        assert_eq!(back, map);
    }
}
