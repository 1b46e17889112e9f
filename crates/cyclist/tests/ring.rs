use cyclist::{NodeIx, RingIx, RingPool};

fn collect(pool: &RingPool<usize>, ring: RingIx) -> Vec<usize> {
    pool.iter(ring).copied().collect()
}

fn collect_rev(pool: &RingPool<usize>, ring: RingIx) -> Vec<usize> {
    let mut out = Vec::new();
    let Some(head) = pool.head(ring) else { return out };
    let mut cursor = head;
    loop {
        out.push(*pool.value(cursor));
        cursor = pool.prev(cursor);
        if cursor == head {
            break;
        }
    }
    out
}

/// Builds the six-element ring used by the splice tests and returns the
/// nodes named by the surgery: `a = [1, 2, 3, 4, 5, 6]` with handles on the
/// nodes holding 2 and 5.
fn six_ring(pool: &mut RingPool<usize>) -> (RingIx, NodeIx, NodeIx) {
    let a = pool.ring();
    pool.push_back(a, 1);
    let two = pool.push_back(a, 2);
    pool.push_back(a, 3);
    let five = pool.push_back(a, 5);
    pool.insert_before(a, five, 4);
    pool.push_back(a, 6);
    (a, two, five)
}

#[test]
fn splice_clones_endpoints_into_recipient() {
    let mut pool = RingPool::new();
    let (a, two, five) = six_ring(&mut pool);
    assert_eq!(collect(&pool, a), vec![1, 2, 3, 4, 5, 6]);

    let b = pool.ring();
    pool.splice(b, None, a, two, five);

    // The recipient gets copies of both endpoints around the moved arc.
    assert_eq!(collect(&pool, b), vec![2, 3, 4, 5]);
    // The donor re-closes from `first` to `last` and `first` is its head.
    assert_eq!(collect(&pool, a), vec![2, 5, 6, 1]);
}

#[test]
fn donor_endpoints_stay_valid_across_splices() {
    let mut pool = RingPool::new();
    let (a, two, five) = six_ring(&mut pool);

    let b = pool.ring();
    pool.splice(b, None, a, two, five);

    pool.push_front(a, 10);
    assert_eq!(collect(&pool, a), vec![10, 2, 5, 6, 1]);

    // Re-splice out of the same ring using the surviving endpoint nodes.
    pool.clear(b);
    let after_five = pool.next(five);
    assert_eq!(*pool.value(after_five), 6);
    pool.splice(b, None, a, two, after_five);

    assert_eq!(collect(&pool, b), vec![2, 5, 6]);
    assert_eq!(collect(&pool, a), vec![2, 6, 1, 10]);
    assert_eq!(collect_rev(&pool, a), vec![2, 10, 1, 6]);
}

#[test]
fn splice_into_occupied_ring_inserts_before_pos() {
    let mut pool = RingPool::new();
    let (a, two, five) = six_ring(&mut pool);

    let b = pool.ring_from_iter([100, 200]);
    let pos = pool.back(b).unwrap();
    pool.splice(b, Some(pos), a, two, five);

    assert_eq!(collect(&pool, b), vec![100, 2, 3, 4, 5, 200]);
    assert_eq!(collect(&pool, a), vec![2, 5, 6, 1]);
}

#[test]
fn ring_from_iter_preserves_order() {
    let mut pool = RingPool::new();
    let c = pool.ring_from_iter([9, 8, 7, 6]);
    assert_eq!(collect(&pool, c), vec![9, 8, 7, 6]);
    assert_eq!(pool.len(c), 4);
}
