#[cfg(test)]
mod tests {
    use blob_core::prelude::*;
    use blob_core::telemetry::{Stage, TelemetryCounters};

    #[test]
    fn disabled_by_default() {
        let m = Materializer::default();
        assert!(matches!(m.snapshot(), Ok(None)));
    }

    #[test]
    fn counts_buffers_and_texts() -> anyhow::Result<()> {
        let m = Materializer::new(MaterializeConfig::sequential())?.with_telemetry();
        let multi = Blob::from_parts(["ab", "cd"]);
        let single = Blob::from_parts(["single"]);

        pollster::block_on(m.to_buffer(&multi))?;
        pollster::block_on(m.to_buffer(&single))?;
        pollster::block_on(m.to_text(&Blob::from_parts(vec![Fragment::from(vec![0xffu8]), Fragment::from("x")])))?;

        let snap = m.snapshot()?.expect("enabled");
        let c = &snap.counters;
        assert_eq!(c.buffers_materialized, 2);
        assert_eq!(c.texts_decoded, 1);
        assert_eq!(c.lossy_decodes, 1);
        assert_eq!(c.bytes_shared, 6);
        assert_eq!(c.bytes_copied, 4 + 2);
        assert_eq!(c.parallel_jobs, 0);
        assert!(snap.stage_times.get(Stage::Copy) <= snap.elapsed);
        assert!(snap.total_stage_time() <= snap.elapsed);
        assert!(snap.total_stage_time() >= snap.stage_times.get(Stage::Copy));
        Ok(())
    }

    #[test]
    fn clones_share_the_recorder() -> anyhow::Result<()> {
        let m = Materializer::default().with_telemetry();
        let other = m.clone();
        pollster::block_on(other.to_buffer(&Blob::from_parts(["a", "b"])))?;
        assert_eq!(m.snapshot()?.expect("enabled").counters.buffers_materialized, 1);
        Ok(())
    }

    #[test]
    fn snapshot_serializes_to_json() -> anyhow::Result<()> {
        let m = Materializer::default().with_telemetry();
        pollster::block_on(m.to_text(&Blob::from_parts(["x", "y"])))?;
        let json = m.snapshot()?.expect("enabled").to_json()?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["counters"]["texts_decoded"], 1);
        assert!(value["stage_times"]["times"].get("Copy").is_some());
        Ok(())
    }

    #[test]
    fn counters_merge() {
        let mut a = TelemetryCounters { bytes_copied: 3, chunks_streamed: 1, ..Default::default() };
        let b = TelemetryCounters { bytes_copied: 4, parallel_jobs: 2, ..Default::default() };
        a += b;
        assert_eq!(a.bytes_copied, 7);
        assert_eq!(a.parallel_jobs, 2);
        assert_eq!(a.chunks_streamed, 1);
    }
}
