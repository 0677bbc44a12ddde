use chrono::{NaiveDate, NaiveTime, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use forecourt_core::{Money, TransactionId};
use forecourt_ledger::{
    balance_as_of, compute_statement, AccountNumber, TransactionRecord, TransactionType,
};

fn history(postings: u64) -> Vec<TransactionRecord> {
    let account = AccountNumber::FIRST;
    let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    (1..=postings)
        .map(|seq| {
            let ttype = if seq % 3 == 0 {
                TransactionType::Dr
            } else {
                TransactionType::Cr
            };
            TransactionRecord {
                seq,
                transaction_id: TransactionId::new(),
                account,
                transaction_type: ttype,
                amount: Money::from_minor((seq % 997 + 1) as i128 * 25),
                date: NaiveDate::from_ymd_opt(2024, (seq % 12 + 1) as u32, (seq % 28 + 1) as u32)
                    .unwrap(),
                time,
                description: format!("posting {seq}"),
                payment: None,
                recorded_at: Utc::now(),
            }
        })
        .collect()
}

fn bench_compute_statement(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_statement");
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();

    for size in [1_000u64, 10_000, 100_000] {
        let txns = history(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txns, |b, txns| {
            b.iter(|| compute_statement(AccountNumber::FIRST, txns, start, end));
        });
    }
    group.finish();
}

fn bench_balance_as_of(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance_as_of");
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

    for size in [1_000u64, 10_000, 100_000] {
        let txns = history(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txns, |b, txns| {
            b.iter(|| balance_as_of(AccountNumber::FIRST, txns, as_of));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute_statement, bench_balance_as_of);
criterion_main!(benches);
