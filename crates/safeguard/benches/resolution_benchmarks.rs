use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use billops_core::{InvoiceId, Money};
use billops_invoicing::InvoiceStatus;
use billops_safeguard::{EntitySnapshot, InvoiceSnapshot, RequestedAction, resolve, resolve_batch};
use chrono::NaiveDate;

fn snapshots(count: usize) -> Vec<EntitySnapshot> {
    let statuses = [
        InvoiceStatus::Pendente,
        InvoiceStatus::Enviada,
        InvoiceStatus::ParcialmentePaga,
        InvoiceStatus::Cancelada,
    ];
    (0..count)
        .map(|i| {
            EntitySnapshot::Invoice(InvoiceSnapshot {
                id: InvoiceId::from_u128(i as u128),
                numero: format!("FT-{i:05}"),
                status: statuses[i % statuses.len()],
                valor_total: Money::from_units(100),
                valor_pago: Money::ZERO,
                tem_pagamentos: i % 3 == 0,
                vencida: i % 5 == 0,
                data_vencimento: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                cliente: None,
            })
        })
        .collect()
}

fn bench_single(c: &mut Criterion) {
    let snapshot = snapshots(1).remove(0);
    c.bench_function("resolve_single_delete", |b| {
        b.iter(|| resolve(black_box(&snapshot), RequestedAction::Delete));
    });
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_batch_delete");
    for size in [10usize, 100, 1_000].iter() {
        let set = snapshots(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("items", size), size, |b, _| {
            b.iter(|| resolve_batch(black_box(&set), RequestedAction::Delete));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single, bench_batch);
criterion_main!(benches);
