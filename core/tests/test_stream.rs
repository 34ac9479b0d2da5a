#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::stream::{FusedStream, StreamExt};

    use blob_core::prelude::*;

    fn sample() -> Blob {
        Blob::from_parts(vec![
            Fragment::from("part1"),
            Fragment::from(vec![1u8, 2, 3, 4, 5]),
            Fragment::from("string part"),
            Fragment::from("part2"),
        ])
    }

    #[test]
    fn stream_concatenation_equals_buffer() {
        let blob = sample();
        let chunks: Vec<Bytes> = pollster::block_on(blob.stream().collect());
        assert_eq!(chunks.len(), 4);

        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.to_vec()).collect();
        let buf = pollster::block_on(blob.array_buffer()).unwrap();
        assert_eq!(joined, buf.to_vec());
        assert_eq!(&chunks[1][..], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn read_reports_done_after_last_chunk() {
        let blob = Blob::from_parts(["a", "bc"]);
        let mut stream = blob.stream();

        pollster::block_on(async {
            let r = stream.read().await;
            assert_eq!(r, ReadResult { value: Some(Bytes::from_static(b"a")), done: false });
            let r = stream.read().await;
            assert_eq!(r.value.as_deref(), Some(&b"bc"[..]));
            assert!(!r.done);
            let r = stream.read().await;
            assert_eq!(r, ReadResult { value: None, done: true });
            // Stays finished.
            assert!(stream.read().await.done);
        });
        assert!(stream.is_terminated());
    }

    #[test]
    fn stream_is_not_restartable_but_blob_is() {
        let blob = Blob::from_parts(["x", "y"]);
        let mut first = blob.stream();
        let drained: Vec<Bytes> = pollster::block_on((&mut first).collect());
        assert_eq!(drained.len(), 2);
        assert!(pollster::block_on(first.next()).is_none());

        let again: Vec<Bytes> = pollster::block_on(blob.stream().collect());
        assert_eq!(again, drained);
    }

    #[test]
    fn empty_blob_stream_finishes_immediately() {
        let blob = Blob::empty();
        let mut stream = blob.stream();
        assert!(pollster::block_on(stream.read()).done);
    }

    #[test]
    fn independent_streams_keep_their_own_position() {
        let blob = Blob::from_parts(["1", "2", "3"]);
        let mut a = blob.stream();
        let mut b = blob.stream();
        pollster::block_on(async {
            assert_eq!(a.next().await.unwrap(), "1");
            assert_eq!(a.next().await.unwrap(), "2");
            assert_eq!(b.next().await.unwrap(), "1");
            assert_eq!(a.next().await.unwrap(), "3");
            assert_eq!(b.next().await.unwrap(), "2");
        });
    }

    #[test]
    fn early_cancel_leaves_blob_intact() {
        let blob = Blob::from_parts(["abc", "def", "ghi"]);
        let mut stream = blob.stream();
        assert_eq!(pollster::block_on(stream.next()).unwrap(), "abc");
        stream.cancel();
        assert!(stream.is_done());
        assert!(pollster::block_on(stream.read()).done);
        drop(stream);

        assert_eq!(pollster::block_on(blob.text()).unwrap(), "abcdefghi");
    }

    #[test]
    fn stream_chunks_are_zero_copy() {
        let blob = Blob::from_parts([vec![5u8; 128], vec![6u8; 128]]);
        let chunks: Vec<Bytes> = pollster::block_on(blob.stream().collect());
        for (chunk, seg) in chunks.iter().zip(blob.segments()) {
            assert_eq!(chunk.as_ptr(), seg.as_slice().as_ptr());
        }
    }

    #[test]
    fn coalescing_merges_small_segments() -> anyhow::Result<()> {
        let parts: Vec<String> = (0..10).map(|i| format!("s{i}")).collect();
        let mut fragments: Vec<Fragment> = parts.iter().map(|p| Fragment::from(p.as_str())).collect();
        fragments.insert(5, Fragment::from(vec![b'#'; 64]));
        let blob = Blob::from_parts(fragments);

        let m = Materializer::new(MaterializeConfig::coalescing(16, Some(6)))?.with_telemetry();
        let chunks: Vec<Bytes> = pollster::block_on(m.to_stream(&blob).collect());

        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.to_vec()).collect();
        assert_eq!(joined, pollster::block_on(blob.array_buffer())?.to_vec());
        assert!(chunks.len() < blob.segment_count());
        assert!(chunks.iter().any(|c| c.len() == 64));
        assert!(chunks.iter().filter(|c| c.len() != 64).all(|c| c.len() <= 6));

        let snap = m.snapshot()?.expect("telemetry enabled");
        assert_eq!(snap.counters.streams_opened, 1);
        assert_eq!(snap.counters.chunks_streamed, chunks.len() as u64);
        assert_eq!(snap.counters.bytes_streamed, blob.size() as u64);
        Ok(())
    }
}
