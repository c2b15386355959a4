pub mod core;
pub mod schema;
pub mod tuple;
pub mod query;
pub mod storage;
pub mod ingest;

/*
┌──────────────────────────────────── INGESTION PATH ─────────────────────────────────────┐
│                                                                                         │
│  JSON line ──► ingest::record::parse_json_record ──► RawRecord (name → raw text)        │
│                                                         │                               │
│                                                         ▼                               │
│  ┌──────────────────────┐        ┌──────────────────────────────────────────────┐      │
│  │ struct Schema        │ ─────► │ Tuple::from_record                           │      │
│  │ • attributes: Vec<>  │ Arc    │ • per attribute, in schema order:            │      │
│  │ • positions: HashMap │        │   core::types::parse(type, raw) → Field      │      │
│  └──────────────────────┘        └──────────────────────────────────────────────┘      │
│                                                         │                               │
│                                                         ▼                               │
│  IngestJob::run ──► WriterSession (open … insert … close, close on drop)                │
│                          │                                                              │
│                          ├── MemoryWriter     (Arc<RwLock<Vec<Tuple>>>)                 │
│                          └── TupleLogWriter   ([len][crc32][bincode] per tuple)         │
└─────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── PLANNING PATH ──────────────────────────────────────┐
│                                                                                         │
│  enum ExtractPredicate                     query::planner::compile(pred, id)            │
│  • Keyword(KeywordExtractPredicate)  ──►   • KeywordMatcher { matchingFields,           │
│  • Regex(RegexExtractPredicate)              keywords, matchingType }                   │
│                                            • RegexMatcher   { matchingFields, regex }   │
│                                                         │                               │
│                                                         ▼                               │
│                                 OperatorDescriptor { id, operatorType, properties }     │
│                                 (JSON wire shape for the execution engine)              │
└─────────────────────────────────────────────────────────────────────────────────────────┘
*/
