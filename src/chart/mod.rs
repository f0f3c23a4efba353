/// Geometry: scales and the per-chart layout built on them.
///
/// ```text
///   IrisDataset ──► stats ──► QuartileSummary per species
///        │                          │
///        ▼                          ▼
///   LinearScale / BandScale ──► layout ──► ScatterChart, BoxPlotChart
/// ```

pub mod layout;
pub mod scale;
