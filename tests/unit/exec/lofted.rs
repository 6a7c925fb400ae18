use super::*;
use crate::exec::network::Network;

fn bits(s: &str) -> Mask {
    Mask::from_bits(s.chars().map(|c| c == '1'))
}

fn setup(nodes: usize, outputs: usize) -> (Network, Vec<NodeId>) {
    let mut net = Network::new();
    let ids = (0..nodes).map(|_| net.add_node(outputs).unwrap()).collect();
    (net, ids)
}

#[test]
fn opts_validation() {
    assert!(LoftedSetOpts::default().validate().is_ok());
    let err = LoftedSetOpts {
        threads: Some(0),
        ..LoftedSetOpts::default()
    }
    .validate()
    .unwrap_err();
    assert!(err.to_string().contains("'threads' must be >= 1"));
    assert!(
        LoftedOutputSet::with_opts(LoftedSetOpts {
            shards: 0,
            ..LoftedSetOpts::default()
        })
        .is_err()
    );
}

#[test]
fn add_fails_beyond_capacity() {
    let (net, ids) = setup(2, 1);
    let mut set = LoftedOutputSet::new();
    let out = net.node(ids[1]).unwrap().outputs()[0];
    assert!(!set.add(out, &bits("1")));
    assert!(set.is_empty());

    set.resize(net.node_capacity());
    assert!(set.add(out, &bits("1")));
    assert_eq!(set.len(), 1);
}

#[test]
fn repeated_add_unions_and_counts_once() {
    let (net, ids) = setup(1, 1);
    let mut set = LoftedOutputSet::new();
    set.resize(1);
    let out = net.node(ids[0]).unwrap().outputs()[0];

    assert!(set.add(out, &bits("1100")));
    assert!(set.add(out, &bits("0110")));
    assert_eq!(set.mask_of(&out), Some(bits("1110")));
    assert_eq!(set.node_ref_count(ids[0]), 1);

    set.remove(out.id, out.node, &bits("1110"));
    assert!(!set.contains(&out));
    assert_eq!(set.node_ref_count(ids[0]), 0);

    // A second removal finds nothing and must not underflow.
    set.remove(out.id, out.node, &bits("1110"));
    assert_eq!(set.node_ref_count(ids[0]), 0);
}

#[test]
fn partial_remove_shrinks_mask() {
    let (net, ids) = setup(1, 2);
    let mut set = LoftedOutputSet::new();
    set.resize(1);
    let node = net.node(ids[0]).unwrap();
    let (a, b) = (node.outputs()[0], node.outputs()[1]);
    set.add(a, &bits("1111"));
    set.add(b, &bits("1000"));
    assert_eq!(set.node_ref_count(ids[0]), 2);

    set.remove(a.id, a.node, &bits("0011"));
    assert_eq!(set.mask_of(&a), Some(bits("1100")));
    set.remove(a.id, a.node, &bits("0100"));
    assert_eq!(set.mask_of(&a), Some(bits("1000")));
    set.remove(a.id, a.node, &bits("1000"));
    assert!(!set.contains(&a));
    assert_eq!(set.node_ref_count(ids[0]), 1);

    // Empty mask removes everything for the output.
    set.remove(b.id, b.node, &Mask::default());
    assert!(set.is_empty());
    assert_eq!(set.node_ref_count(ids[0]), 0);
}

#[test]
fn resize_never_shrinks() {
    let (net, ids) = setup(3, 1);
    let mut set = LoftedOutputSet::new();
    set.resize(3);
    let out = net.node(ids[2]).unwrap().outputs()[0];
    set.add(out, &bits("1"));

    set.resize(1);
    assert_eq!(set.capacity(), 3);
    assert_eq!(set.node_ref_count(ids[2]), 1);
    assert_eq!(set.mask_of(&out), Some(bits("1")));
}

#[test]
fn remove_all_outputs_for_node_zeroes_count() {
    let (net, ids) = setup(2, 3);
    let mut set = LoftedOutputSet::new();
    set.resize(2);
    for id in &ids {
        for out in net.node(*id).unwrap().outputs() {
            set.add(*out, &bits("1"));
        }
    }
    assert_eq!(set.len(), 6);

    set.remove_all_outputs_for_node(net.node(ids[0]).unwrap());
    assert_eq!(set.len(), 3);
    assert_eq!(set.node_ref_count(ids[0]), 0);
    assert_eq!(set.node_ref_count(ids[1]), 3);
}

#[test]
fn clear_drops_everything() {
    let (net, ids) = setup(4, 1);
    let mut set = LoftedOutputSet::new();
    set.resize(4);
    for id in &ids {
        set.add(net.node(*id).unwrap().outputs()[0], &bits("11"));
    }
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.capacity(), 4);
    assert!(ids.iter().all(|id| set.node_ref_count(*id) == 0));
}

fn collect_with(opts: LoftedSetOpts) {
    let (net, ids) = setup(8, 2);
    let mut set = LoftedOutputSet::with_opts(opts).unwrap();
    set.resize(net.node_capacity());
    let lofted: Vec<Output> = ids
        .iter()
        .step_by(2)
        .map(|id| net.node(*id).unwrap().outputs()[0])
        .collect();
    for out in &lofted {
        set.add(*out, &bits("0111"));
    }

    let deps: HashMap<Output, Mask> = net
        .nodes()
        .flat_map(|n| n.outputs().iter().copied())
        .map(|o| (o, bits("1100")))
        .collect();

    let mut got = set.collect_lofted_dependencies(&deps);
    got.sort_by_key(|m| m.output);
    assert_eq!(got.len(), lofted.len());
    for (m, out) in got.iter().zip(&lofted) {
        assert_eq!(m.output, *out);
        assert_eq!(m.mask, bits("0100"));
    }
}

#[test]
fn collect_lofted_dependencies_serial() {
    collect_with(LoftedSetOpts::default());
}

#[test]
fn collect_lofted_dependencies_parallel() {
    collect_with(LoftedSetOpts {
        parallel_threshold: 0,
        threads: Some(2),
        ..LoftedSetOpts::default()
    });
}

#[test]
fn collect_on_empty_set_is_empty() {
    let set = LoftedOutputSet::new();
    let deps = HashMap::from([(
        Output::new(OutputId::new(0, 0), NodeId::new(0, 0)),
        bits("1"),
    )]);
    assert!(set.collect_lofted_dependencies(&deps).is_empty());
}
