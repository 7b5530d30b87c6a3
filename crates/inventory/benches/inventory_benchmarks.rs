use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{Duration, Utc};
use larder_core::{AggregateId, CatalogItemId, ListId};
use larder_inventory::{
    CatalogItem, Category, InventoryCommand, InventoryItem, ItemId, ItemKind, NewCatalogItem,
    NewItem, ShelfLife, SplitContainer, StorageSize, expiring_within, freshness_status,
};

fn pantry(size: usize) -> Vec<InventoryItem> {
    let catalog = CatalogItem::from_new(
        CatalogItemId::new(),
        NewCatalogItem::named("Milk", Category::Dairy).with_units("gallon", "cup", 16),
    );
    let list_id = ListId::new();
    let now = Utc::now();

    (0..size)
        .map(|idx| {
            let draft = NewItem::acquire(list_id, &catalog, 1, None, now)
                .expect("valid draft")
                .opened(now - Duration::hours(idx as i64 % 240))
                .with_shelf_life(ShelfLife::Days(1 + (idx as u32 % 14)));
            InventoryItem::from_new(ItemId::new(AggregateId::new()), draft)
        })
        .collect()
}

fn bench_freshness_status(c: &mut Criterion) {
    let mut group = c.benchmark_group("freshness_status");
    let now = Utc::now();
    let opened = now - Duration::days(4);

    group.bench_function("finite_shelf_life", |b| {
        b.iter(|| freshness_status(black_box(Some(opened)), black_box(ShelfLife::Days(9)), now))
    });

    group.finish();
}

fn bench_expiring_within(c: &mut Criterion) {
    let mut group = c.benchmark_group("expiring_within");
    let now = Utc::now();

    for size in [100usize, 1_000, 10_000].iter() {
        let items = pantry(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| expiring_within(black_box(items), 3, now).len())
        });
    }

    group.finish();
}

fn bench_split_gallon(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_container");
    let parent = pantry(1)
        .pop()
        .map(|item| {
            let draft = NewItem {
                list_id: item.list_id(),
                catalog: item.catalog().clone(),
                quantity: 1,
                uses_remaining: 16,
                location: item.location(),
                kind: ItemKind::SplittableContainer {
                    storage_size: StorageSize::Gallon,
                },
                opened_at: item.opened_at(),
                purchased_at: item.purchased_at(),
                shelf_life: item.shelf_life(),
            };
            InventoryItem::from_new(item.id_typed(), draft)
        })
        .expect("one item");

    group.bench_function("gallon_into_pints", |b| {
        b.iter(|| {
            parent
                .transition(black_box(&InventoryCommand::SplitContainer(SplitContainer {
                    item_id: parent.id_typed(),
                    target_size: StorageSize::Pint,
                    count: 8,
                    occurred_at: Utc::now(),
                })))
                .map(|t| t.events.len())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_freshness_status,
    bench_expiring_within,
    bench_split_gallon
);
criterion_main!(benches);
