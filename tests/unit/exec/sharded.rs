use super::*;
use crate::exec::ids::{NodeId, OutputId};

fn out(i: u32) -> Output {
    Output::new(OutputId::new(i, 0), NodeId::new(i / 4, 0))
}

#[test]
fn shard_count_is_a_power_of_two() {
    assert_eq!(ShardedMap::<Output, u8>::new(0).shard_count(), 1);
    assert_eq!(ShardedMap::<Output, u8>::new(5).shard_count(), 8);
    assert_eq!(ShardedMap::<Output, u8>::new(64).shard_count(), 64);
}

#[test]
fn len_tracks_inserts_and_removals() {
    let mut map = ShardedMap::new(4);
    for i in 0..100 {
        map.with_shard_mut(&out(i), |m| m.insert(out(i), i));
    }
    assert_eq!(map.len(), 100);
    map.with_shard_mut(&out(3), |m| m.insert(out(3), 42));
    assert_eq!(map.len(), 100);
    assert_eq!(map.read(&out(3), |v| v.copied()), Some(42));

    assert_eq!(map.remove(&out(3)), Some(42));
    assert_eq!(map.remove(&out(3)), None);
    assert_eq!(map.len(), 99);

    map.clear();
    assert_eq!(map.len(), 0);
    assert_eq!(map.read(&out(4), |v| v.copied()), None);
}
