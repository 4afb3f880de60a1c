use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use livetiles::feed::{FeedSnapshot, LiveEntry, MemberInfo};
use livetiles::page::PageShell;
use livetiles::relay::LogRelay;
use livetiles::{PageConfig, PageController};

fn feed(live: usize, members: usize) -> FeedSnapshot {
    let mut feed = FeedSnapshot::default();
    for i in 0..members {
        feed.member.insert(
            format!("m{}", i),
            MemberInfo {
                icon_url: format!("https://example.com/{}.png", i),
                color: format!("#{:02x}{:02x}{:02x}", i * 7 % 256, i * 13 % 256, i * 29 % 256),
            },
        );
    }
    for i in 0..live {
        feed.live.push(LiveEntry {
            from: format!("m{}", i % members),
            video_id: format!("video{:06}", i),
        });
    }
    feed
}

fn bench_render(c: &mut Criterion) {
    let controller = PageController::new(PageConfig::default(), Arc::new(LogRelay));

    let live = feed(12, 24);
    c.bench_function("render_live_12", |b| {
        b.iter(|| {
            let (mut doc, shell) = PageShell::build(controller.config()).unwrap();
            controller.render(&live, &mut doc, &shell).unwrap();
            doc.to_html()
        })
    });

    let offline = feed(0, 24);
    c.bench_function("render_offline_24", |b| {
        b.iter(|| {
            let (mut doc, shell) = PageShell::build(controller.config()).unwrap();
            controller.render(&offline, &mut doc, &shell).unwrap();
            doc.to_html()
        })
    });
}

fn bench_adjust(c: &mut Criterion) {
    c.bench_function("adjust_hex_color", |b| {
        b.iter(|| livetiles::color::adjust_hex_color(criterion::black_box("#336699"), -100))
    });
}

criterion_group!(benches, bench_render, bench_adjust);
criterion_main!(benches);
