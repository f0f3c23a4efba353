/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  detect layout, parse → IrisDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ IrisDataset  │  Vec<Record>, variant, species order
///   └─────────────┘
/// ```

pub mod loader;
pub mod model;
