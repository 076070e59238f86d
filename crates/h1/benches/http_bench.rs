use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use http::StatusCode;
use micro_h1::codec::{DecoderConfig, RequestDecoder, ResponseEncoder};
use micro_h1::connection::{HttpConnection, IoSource, decode_request};
use micro_h1::handler::make_handler;
use micro_h1::protocol::{Request, Response};
use tokio::runtime::Runtime;
use tokio_util::codec::Encoder;

const REQUEST: &[u8] = b"POST /coffee HTTP/1.1\r\n\
Host: localhost:42069\r\n\
User-Agent: curl/8.4.0\r\n\
Accept: */*\r\n\
Content-Type: application/json\r\n\
Content-Length: 39\r\n\
\r\n\
{\"type\": \"dark mode\", \"size\": \"medium\"}";

async fn hello(_req: Request) -> Response {
    Response::new(StatusCode::OK, "Hello World!")
}

fn bench_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_request");
    group.throughput(Throughput::Bytes(REQUEST.len() as u64));

    for chunk_size in [1, 8, 64, 4096] {
        let config = DecoderConfig::new().with_chunk_size(chunk_size);
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &config, |b, config| {
            b.iter(|| black_box(decode_request(IoSource::new(REQUEST), config).unwrap()));
        });
    }
    group.finish();
}

fn bench_single_feed(c: &mut Criterion) {
    c.bench_function("feed_whole_request", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            black_box(decoder.feed(black_box(REQUEST)).unwrap());
        });
    });
}

fn bench_response_encoder(c: &mut Criterion) {
    let response = Response::new(StatusCode::OK, "Hello World!");

    c.bench_function("encode_simple_response", |b| {
        b.iter(|| {
            let mut encoder = ResponseEncoder::new();
            let mut bytes = bytes::BytesMut::new();
            encoder.encode(response.clone(), &mut bytes).unwrap();
            black_box(bytes);
        });
    });
}

fn bench_http_connection(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let handler = Arc::new(make_handler(hello));

    c.bench_function("process_simple_request", |b| {
        b.to_async(&runtime).iter(|| {
            let handler = Arc::clone(&handler);
            async move {
                let mut written = Vec::with_capacity(128);
                HttpConnection::new(REQUEST, &mut written).process(handler).await.unwrap();
                black_box(written);
            }
        });
    });
}

criterion_group!(benches, bench_chunk_sizes, bench_single_feed, bench_response_encoder, bench_http_connection);
criterion_main!(benches);
