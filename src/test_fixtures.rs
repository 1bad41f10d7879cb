//! Small upstream table sets shared by tests.
//!
//! Forward locus `chr5:1001:2000:+1` (chromosome = 1000 + relative):
//! - isoform 1: three exons, CDS 11..70 (ATG at 11, TAA at 68)
//! - isoform 2: one exon, CDS 4..27 (ATG at 4, TGA at 25)
//! - isoform 3: two exons, no CDS, poly-A with PAS evidence
//!
//! Reverse locus `chr9:2001:3000:-1` (chromosome = 3001 - relative) repeats isoform 1.

pub const GENOMIC: &str = ">chr5:1001:2000:+1\nACGTACGTAC\n";

pub const FACTORIZATIONS: &str = "\
>EST1 /gb=EST1
1 20 1 20 CCCCCCCCCCATGGCAGCAG CCCCCCCCCCATGGCAGCAG
21 50 101 130 CAGCAGCAGCAGCAGCAGCAGCAGCAGCAG CAGCAGCAGCAGCAGCAGCAGCAGCAGCAG
51 90 201 240 CAGCAGCAGCAGCAGCATAACCCCCCCCCCCCCCCCCCCC CAGCAGCAGCAGCAGCATAACCCCCCCCCCCCCCCCCCCC
>EST2 /gb=EST2 /clone_end=3'
1 20 1 20 CCCCCCCCCCATGGCAGCAG CCCCCCCCCCATGGCAGCAG
21 60 201 240 CAGCAGCAGCAGCAGCATAACCCCCCCCCCCCCCCCCCCC CAGCAGCAGCAGCAGCATAACCCCCCCCCCCCCCCCCCCC
>EST3
1 20 1 20 CCCCCCCCCCATGGCAGCAG CCCCCCCCCCATGGCAGCAG
#polya=1
#polyad=1
21 55 201 235 CAGCAGCAGCAGCAGCATAACCCCCCCCCCCCCCC CAGCAGCAGCAGCAGCATAACCCCCCCCCCCCCCC
";

pub const INTRONS: &str = "\
21\t100\t1021\t1100\t80\t1\tEST1,\t0.0\t0.0\t90.5\t88.0\t2.500000\t40\t1\tGT-AG\t.\tGCAG\tGTAAG\tTTCAG\tCAG
131\t200\t1131\t1200\t70\t1\tEST1,\t0.0\t0.5\t85.0\t80.0\t0.000000\t-1\t1\tGT-AG\t.\tGCAG\tGTGAG\tCCTAG\tCAG
21\t200\t1021\t1200\t180\t1\tEST2,\t0.0\t0.0\t70.0\t75.0\t1.000000\t-1\t0\tAT-AC\tAluSx\tGCAG\tATATC\tTCCAC\tCAG
";

pub const VARIANTS: &str = "\
variant_isoform#1 /nex=3 /L=90 /CDS=11..70 /RefSeq=NM_000001(YY) /ProtL=19 /Frame=yes /Type=Ref
variant_isoform#2 /nex=1 /L=60 /CDS=4..27 /RefSeq=NM_000001(YY) /ProtL=7 /Frame=no /Type=Alt
variant_isoform#3 /nex=2 /L=60 /CDS=.. /RefSeq=NM_000001(NN) /ProtL=.. /Frame=.. /Type=NC
";

pub const GEOMETRY: &str = "\
3
1000
>1:3:1:1:-1
1001:1020:1:20:0:10:-1
CCCCCCCCCCATGGCAGCAG
1101:1130:101:130:0:-1:-1
CAGCAGCAGCAGCAGCAGCAGCAGCAGCAG
1201:1240:201:240:0:-1:20
CAGCAGCAGCAGCAGCATAACCCCCCCCCCCCCCCCCCCC
>2:1:0:0:0
1301:1360:301:360:0:3:33
CCCATGGCAGCAGCAGCAGCAGCATGACCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC
>3:2:0:0:1
1001:1020:1:20:0:-1:-1
CCCCCCCCCCATGGCAGCAG
1201:1240:201:240:1:-1:-1
CAGCAGCAGCAGCAGCATAACCCCCCCCCCCCCCCCCCCC
";

pub const REVERSE_GENOMIC: &str = ">chr9:2001:3000:-1\nACGT\n";

pub const REVERSE_INTRONS: &str = "\
21\t100\t2980\t2901\t80\t0\t\t0.0\t0.0\t90.5\t88.0\t2.5\t12\t1\tGT-AG\t.\tGCAG\tGTAAG\tTTCAG\tCAG
131\t200\t2870\t2801\t70\t0\t\t0.0\t0.0\t85.0\t80.0\t0.0\t-1\t1\tGT-AG\t.\tGCAG\tGTGAG\tCCTAG\tCAG
";

pub const REVERSE_VARIANTS: &str =
    "variant_isoform#1 /nex=3 /L=90 /CDS=11..70 /ProtL=19 /Frame=yes /Type=Ref\n";

pub const REVERSE_GEOMETRY: &str = "\
1
1000
>1:3:1:0:-1
3000:2981:1:20:0:10:-1
CCCCCCCCCCATGGCAGCAG
2900:2871:101:130:0:-1:-1
CAGCAGCAGCAGCAGCAGCAGCAGCAGCAG
2800:2761:201:240:0:-1:20
CAGCAGCAGCAGCAGCATAACCCCCCCCCCCCCCCCCCCC
";

/// Two-exon isoform whose TAA stop codon spans the junction (TA | A).
pub const SPLIT_STOP_VARIANTS: &str = "variant_isoform#1 /nex=2 /L=15 /CDS=3..11 /ProtL=2\n";

pub const SPLIT_STOP_GENOMIC: &str = ">chr3:1:600:+1\nACGT\n";

pub const SPLIT_STOP_GEOMETRY: &str = "\
1
600
>1:2:0:0:-1
101:110:1:10:0:2:-1
CCATGGCCTA
201:205:101:105:0:-1:4
AGGGG
";

pub const REVERSE_SPLIT_STOP_GENOMIC: &str = ">chr3:1:600:-1\nACGT\n";

pub const REVERSE_SPLIT_STOP_GEOMETRY: &str = "\
1
600
>1:2:0:0:-1
500:491:101:110:0:2:-1
CCATGGCCTA
300:296:301:305:0:-1:4
AGGGG
";
