use quadtree::quadtree::{Config, QuadTree};
use quadtree::shapes::Rect;
use quadtree::QuadtreeError;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

fn world() -> Rect {
    Rect::new(0.0, 0.0, 1000.0, 1000.0)
}

fn small_config() -> Config {
    Config {
        node_capacity: 4,
        max_depth: 6,
        merge_threshold: 2,
        ..Config::default()
    }
}

fn random_rect<R: Rng>(rng: &mut R, bounds: &Rect, max_size: f32) -> Rect {
    let width = rng.gen_range(0.5..max_size);
    let height = rng.gen_range(0.5..max_size);
    bounds.random_rect_inside(width, height, rng)
}

fn naive_query(entities: &HashMap<u32, Rect>, query: &Rect) -> HashSet<u32> {
    entities
        .iter()
        .filter(|(_, rect)| rect.intersects(query))
        .map(|(id, _)| *id)
        .collect()
}

fn query_set(qt: &QuadTree, query: &Rect) -> HashSet<u32> {
    let mut out = Vec::new();
    qt.query_rect(query, &mut out);
    let set: HashSet<u32> = out.iter().copied().collect();
    assert_eq!(set.len(), out.len(), "query returned duplicates");
    set
}

#[test]
fn test_single_collision() {
    let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    qt.insert(0, Rect::new(0.0, 15.0, 100.0, 50.0)).unwrap();
    let mut collisions: Vec<u32> = Vec::new();
    qt.query_rect(&Rect::new(0.0, 0.0, 20.0, 20.0), &mut collisions);
    assert_eq!(collisions, vec![0]);
}

#[test]
fn test_no_collision() {
    let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    qt.insert(0, Rect::new(10.0, 10.0, 20.0, 20.0)).unwrap();
    qt.insert(1, Rect::new(50.0, 50.0, 20.0, 20.0)).unwrap();
    let mut collisions: Vec<u32> = Vec::new();
    qt.query_rect(&Rect::new(80.0, 80.0, 10.0, 10.0), &mut collisions);
    assert!(collisions.is_empty());
}

#[test]
fn test_touching_edges_do_not_collide() {
    let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    qt.insert(0, Rect::new(10.0, 10.0, 10.0, 10.0)).unwrap();
    let mut collisions: Vec<u32> = Vec::new();
    qt.query_rect(&Rect::new(20.0, 10.0, 10.0, 10.0), &mut collisions);
    assert!(collisions.is_empty());
}

#[test]
fn test_out_of_bounds_insert_is_refused() {
    let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    let err = qt.insert(7, Rect::new(95.0, 10.0, 10.0, 10.0)).unwrap_err();
    assert!(matches!(err, QuadtreeError::RectOutOfBounds { .. }));
    assert!(!qt.contains(7));
    assert!(qt.is_empty());
    qt.validate().unwrap();
}

#[test]
fn test_invalid_rect_is_refused() {
    let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    let err = qt.insert(1, Rect::new(10.0, 10.0, -1.0, 5.0)).unwrap_err();
    assert!(matches!(err, QuadtreeError::InvalidRectangleDims { .. }));
    let err = qt.insert(2, Rect::new(f32::NAN, 10.0, 1.0, 5.0)).unwrap_err();
    assert!(matches!(err, QuadtreeError::InvalidRectangleDims { .. }));
    assert!(qt.is_empty());
}

#[test]
fn test_stale_references_are_no_ops() {
    let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    qt.insert(1, Rect::new(10.0, 10.0, 5.0, 5.0)).unwrap();
    assert_eq!(
        qt.remove(42),
        Err(QuadtreeError::UnknownEntity { value: 42 })
    );
    assert_eq!(
        qt.update(42, Rect::new(1.0, 1.0, 1.0, 1.0)),
        Err(QuadtreeError::UnknownEntity { value: 42 })
    );
    assert_eq!(qt.len(), 1);
    qt.validate().unwrap();
}

#[test]
fn test_degenerate_query_returns_nothing() {
    let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    qt.insert(1, Rect::new(10.0, 10.0, 50.0, 50.0)).unwrap();
    let mut out = Vec::new();
    qt.query_rect(&Rect::new(20.0, 20.0, 0.0, 0.0), &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_reinsert_replaces_entry() {
    let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    qt.insert(1, Rect::new(10.0, 10.0, 5.0, 5.0)).unwrap();
    qt.insert(1, Rect::new(80.0, 80.0, 5.0, 5.0)).unwrap();
    assert_eq!(qt.len(), 1);
    assert_eq!(qt.bounds_of(1), Some(Rect::new(80.0, 80.0, 5.0, 5.0)));
    qt.validate().unwrap();
}

#[test]
fn test_straddling_entity_stays_in_parent() {
    let mut qt = QuadTree::new_with_config(
        Rect::new(0.0, 0.0, 100.0, 100.0),
        Config {
            node_capacity: 1,
            ..Config::default()
        },
    );
    qt.insert(0, Rect::new(45.0, 45.0, 10.0, 10.0)).unwrap();
    qt.insert(1, Rect::new(10.0, 10.0, 5.0, 5.0)).unwrap();
    qt.insert(2, Rect::new(70.0, 70.0, 5.0, 5.0)).unwrap();
    assert!(qt.depth() >= 1);
    qt.validate().unwrap();

    let mut out = Vec::new();
    qt.query_point(50.0, 50.0, &mut out);
    assert_eq!(out, vec![0]);
}

#[test]
fn test_index_containment() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut qt = QuadTree::new_with_config(world(), small_config());
    let mut entities = HashMap::new();
    for id in 0..600 {
        let rect = random_rect(&mut rng, &world(), 40.0);
        qt.insert(id, rect).unwrap();
        entities.insert(id, rect);
    }
    qt.validate().unwrap();
    assert_eq!(qt.len(), entities.len());
    assert!(qt.depth() > 0);

    let all = query_set(&qt, &world());
    let expected: HashSet<u32> = entities.keys().copied().collect();
    assert_eq!(all, expected);
    for (id, rect) in &entities {
        assert_eq!(qt.bounds_of(*id), Some(*rect));
    }
}

#[test]
fn test_query_matches_reference_scan() {
    let mut rng = StdRng::seed_from_u64(36207250);
    let mut qt = QuadTree::new_with_config(world(), small_config());
    let mut entities = HashMap::new();
    for id in 0..400 {
        let rect = random_rect(&mut rng, &world(), 60.0);
        qt.insert(id, rect).unwrap();
        entities.insert(id, rect);
    }

    for round in 0..20 {
        // Move a third, delete a few, add a few.
        for id in 0..400 {
            if !entities.contains_key(&id) || rng.gen_range(0..3) != 0 {
                continue;
            }
            let rect = random_rect(&mut rng, &world(), 60.0);
            qt.update(id, rect).unwrap();
            entities.insert(id, rect);
        }
        for _ in 0..5 {
            let id = rng.gen_range(0..400);
            if entities.remove(&id).is_some() {
                qt.remove(id).unwrap();
            }
        }
        for offset in 0..5 {
            let id = 1000 + round * 5 + offset;
            let rect = random_rect(&mut rng, &world(), 60.0);
            qt.insert(id, rect).unwrap();
            entities.insert(id, rect);
        }
        qt.validate().unwrap();

        for _ in 0..25 {
            let query = random_rect(&mut rng, &world(), 300.0);
            assert_eq!(query_set(&qt, &query), naive_query(&entities, &query));
        }
    }
}

#[test]
fn test_query_point_matches_reference_scan() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut qt = QuadTree::new_with_config(world(), small_config());
    let mut entities = HashMap::new();
    for id in 0..300 {
        let rect = random_rect(&mut rng, &world(), 80.0);
        qt.insert(id, rect).unwrap();
        entities.insert(id, rect);
    }
    for _ in 0..100 {
        let (x, y) = (rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0));
        let mut out = Vec::new();
        qt.query_point(x, y, &mut out);
        let got: HashSet<u32> = out.into_iter().collect();
        let expected: HashSet<u32> = entities
            .iter()
            .filter(|(_, rect)| rect.contains_point(x, y))
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(got, expected);
    }
}

#[test]
fn test_all_pairs_matches_reference_scan() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut qt = QuadTree::new_with_config(world(), small_config());
    let mut entities = Vec::new();
    for id in 0..250 {
        let rect = random_rect(&mut rng, &world(), 70.0);
        qt.insert(id, rect).unwrap();
        entities.push((id, rect));
    }

    let mut pairs = Vec::new();
    qt.query_all_pairs(&mut pairs);

    let mut expected = Vec::new();
    for (i, (a, a_rect)) in entities.iter().enumerate() {
        for (b, b_rect) in &entities[i + 1..] {
            if a_rect.intersects(b_rect) {
                expected.push((*a.min(b), *a.max(b)));
            }
        }
    }
    expected.sort_unstable();
    assert_eq!(pairs, expected);
}

#[test]
fn test_split_then_merge_back_to_single_node() {
    let mut qt = QuadTree::new_with_config(Rect::new(0.0, 0.0, 100.0, 100.0), small_config());
    let mut rng = StdRng::seed_from_u64(3);
    let area = Rect::new(0.0, 0.0, 40.0, 40.0);
    for id in 0..50 {
        qt.insert(id, area.random_rect_inside(2.0, 2.0, &mut rng)).unwrap();
    }
    assert!(qt.node_count() > 1);
    for id in 0..50 {
        qt.remove(id).unwrap();
        qt.validate().unwrap();
    }
    assert!(qt.is_empty());
    assert_eq!(qt.node_count(), 1);
    assert_eq!(qt.depth(), 0);
}

#[test]
fn test_max_depth_bounds_degenerate_clustering() {
    let config = Config {
        node_capacity: 2,
        max_depth: 3,
        ..Config::default()
    };
    let mut qt = QuadTree::new_with_config(Rect::new(0.0, 0.0, 64.0, 64.0), config);
    for id in 0..100 {
        qt.insert(id, Rect::new(1.0, 1.0, 0.5, 0.5)).unwrap();
    }
    assert_eq!(qt.depth(), 3);
    qt.validate().unwrap();
    let mut out = Vec::new();
    qt.query_rect(&Rect::new(0.0, 0.0, 2.0, 2.0), &mut out);
    assert_eq!(out.len(), 100);
}

#[test]
fn test_update_in_place_and_across_nodes() {
    let mut qt = QuadTree::new_with_config(Rect::new(0.0, 0.0, 100.0, 100.0), small_config());
    for id in 0..20 {
        let offset = id as f32 * 2.0;
        qt.insert(id, Rect::new(offset, offset, 1.0, 1.0)).unwrap();
    }
    // A tiny nudge keeps the entity in its node.
    qt.update(3, Rect::new(6.1, 6.1, 1.0, 1.0)).unwrap();
    assert_eq!(qt.bounds_of(3), Some(Rect::new(6.1, 6.1, 1.0, 1.0)));
    // A jump across the world has to re-home it.
    qt.update(3, Rect::new(90.0, 5.0, 1.0, 1.0)).unwrap();
    assert_eq!(qt.bounds_of(3), Some(Rect::new(90.0, 5.0, 1.0, 1.0)));
    qt.validate().unwrap();

    let mut out = Vec::new();
    qt.query_rect(&Rect::new(89.0, 4.0, 3.0, 3.0), &mut out);
    assert_eq!(out, vec![3]);
}

#[test]
fn test_update_out_of_bounds_unindexes() {
    let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    qt.insert(5, Rect::new(90.0, 90.0, 5.0, 5.0)).unwrap();
    let err = qt.update(5, Rect::new(98.0, 90.0, 5.0, 5.0)).unwrap_err();
    assert!(matches!(err, QuadtreeError::RectOutOfBounds { .. }));
    assert!(!qt.contains(5));
    qt.validate().unwrap();
}

#[test]
fn test_flat_update_on_quadrant_seam_keeps_tree_consistent() {
    let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
    let mut qt = QuadTree::new(bounds);
    for id in 0..9 {
        let offset = id as f32 * 3.0;
        qt.insert(id, Rect::new(60.0 + offset, 60.0 + offset, 1.0, 1.0)).unwrap();
    }
    assert!(qt.node_count() > 1);
    qt.insert(100, Rect::new(10.0, 55.0, 1.0, 1.0)).unwrap();

    // Zero height on the horizontal seam fits the top-left quadrant as well.
    let flat = Rect::new(10.0, 50.0, 1.0, 0.0);
    qt.update(100, flat).unwrap();
    qt.validate().unwrap();
    assert_eq!(qt.bounds_of(100), Some(flat));
    let mut out = Vec::new();
    qt.query_point(10.5, 50.0, &mut out);
    assert_eq!(out, vec![100]);

    qt.remove(100).unwrap();
    qt.validate().unwrap();
    assert_eq!(qt.len(), 9);
    let mut out = Vec::new();
    qt.query_rect(&Rect::new(55.0, 55.0, 45.0, 45.0), &mut out);
    out.sort_unstable();
    assert_eq!(out, (0..9).collect::<Vec<u32>>());
}
