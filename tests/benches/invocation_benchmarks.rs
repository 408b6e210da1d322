//! # Invocation Benchmarks
//!
//! | Path | Measures |
//! |------|----------|
//! | dispatch | `Invocation::parse` of the widest action |
//! | transfer | full proposal: parse, two reads, three writes, commit |
//! | queryRecord | rich query over a populated record set |

use bc_chaincode::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn populated_host(records: usize) -> ChaincodeHost {
    let mut host = ChaincodeHost::new(ChaincodeConfig::default()).unwrap();
    assert!(host.instantiate().is_ok());
    assert!(host.invoke("invoke", &["createOrg", "org1", "OrgOne"]).is_ok());
    for i in 0..records {
        let record_id = format!("rec{i}");
        let client_id = format!("client{}", i % 10);
        let args = [
            "submitRecord",
            "org1",
            record_id.as_str(),
            client_id.as_str(),
            "Name",
            "1",
            "2",
            "info",
        ];
        assert!(host.invoke("invoke", &args).is_ok());
    }
    host
}

fn bench_dispatch(c: &mut Criterion) {
    let args = [
        "submitRecord",
        "org1",
        "rec1",
        "clientA",
        "Alice",
        "1",
        "3",
        "late payment",
    ];
    c.bench_function("dispatch_parse_submit_record", |b| {
        b.iter(|| black_box(Invocation::parse("invoke", black_box(&args)).is_ok()))
    });
}

fn bench_transfer(c: &mut Criterion) {
    let mut host = populated_host(0);
    c.bench_function("transfer_agency_to_org", |b| {
        b.iter(|| black_box(host.invoke("invoke", &["transfer", "Agency", "org1", "1"]).is_ok()))
    });
}

fn bench_query_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_record");
    for size in [10usize, 100, 1000] {
        let mut host = populated_host(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("by_client_id", size), &size, |b, _| {
            b.iter(|| {
                black_box(
                    host.invoke("invoke", &["queryRecord", "byClientId", "client3"])
                        .payload
                        .len(),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_transfer, bench_query_record);
criterion_main!(benches);
