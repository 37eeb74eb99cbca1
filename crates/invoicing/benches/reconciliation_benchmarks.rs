use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use billops_core::{InvoiceId, Money};
use billops_invoicing::{
    CreateInvoice, Invoice, InvoiceType, Payment, PaymentMethod, Reconciler, recompute,
};
use chrono::{NaiveDate, TimeZone, Utc};

fn invoice(total_units: i64) -> Invoice {
    Invoice::create(CreateInvoice {
        invoice_id: InvoiceId::from_u128(1),
        numero: "FT-BENCH".to_string(),
        valor_total: Money::from_units(total_units),
        data_emissao: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        data_vencimento: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        tipo: InvoiceType::Recorrente,
        cliente: None,
        occurred_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    })
    .unwrap()
}

fn payments(count: usize) -> Vec<Payment> {
    let at = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            Payment::new(
                InvoiceId::from_u128(1),
                Money::from_units(1),
                PaymentMethod::Pix,
                format!("tx-{i}"),
                at,
            )
            .approved()
        })
        .collect()
}

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute_aggregates");
    let now = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();

    for count in [1usize, 10, 100, 1_000].iter() {
        let inv = invoice(10_000);
        let set = payments(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("payments", count), count, |b, _| {
            b.iter(|| recompute(black_box(&inv), black_box(&set), now).unwrap());
        });
    }

    group.finish();
}

fn bench_apply_payment_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_payment_sequence");
    let reconciler = Reconciler::default();
    let now = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();

    for count in [10usize, 100].iter() {
        let set = payments(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("sequential", count), count, |b, _| {
            b.iter(|| {
                let mut current = invoice(10_000);
                for p in &set {
                    current = reconciler
                        .apply_payment(&current, p.clone(), None, now)
                        .unwrap()
                        .invoice;
                }
                black_box(current)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_recompute, bench_apply_payment_sequence);
criterion_main!(benches);
