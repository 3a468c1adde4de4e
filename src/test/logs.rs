//! Compiler log fixtures.

/// `a` inlines `b` (which inlines `c`) and calls `d` without inlining it.
pub const CHAIN_TASK: &str = "\
<task compile_id='12' compiler='c2' level='4' method='demo/Chain a (I)I' bytes='24' count='5000' stamp='0.512'>
<phase name='parse' nodes='3' live='3' stamp='0.512'>
<type id='680' name='int'/>
<klass id='770' name='demo/Chain' flags='1'/>
<klass id='771' name='demo/Point' flags='1'/>
<method id='772' holder='770' name='a' return='680' arguments='680' flags='1' bytes='24'/>
<parse method='772' uses='5000' stamp='0.512'>
<bc code='183' bci='1'/>
<method id='773' holder='770' name='b' return='680' arguments='680' flags='2' bytes='12'/>
<call method='773' count='5000' prof_factor='1' inline='1'/>
<inline_success reason='inline (hot)'/>
<parse method='773' uses='5000' stamp='0.513'>
<bc code='183' bci='3'/>
<method id='774' holder='770' name='c' return='680' arguments='680' flags='2' bytes='4'/>
<call method='774' count='5000' prof_factor='1' inline='1'/>
<inline_success reason='accessor'/>
<parse method='774' uses='5000' stamp='0.513'>
<parse_done nodes='20' live='19' memory='4096' stamp='0.513'/>
</parse>
<parse_done nodes='30' live='28' memory='8192' stamp='0.513'/>
</parse>
<bc code='182' bci='9'/>
<method id='775' holder='770' name='d' return='680' arguments='680' flags='1' bytes='400'/>
<call method='775' count='5000' prof_factor='1' inline='1'/>
<inline_fail reason='too big'/>
<direct_call bci='9'/>
<bc code='153' bci='14'/>
<branch target_bci='20' taken='0' not_taken='512' cnt='512' prob='never'/>
<uncommon_trap bci='14' reason='unstable_if' action='reinterpret' comment='taken never'/>
<mystery_event bci='18'/>
<parse_done nodes='60' live='55' memory='16384' stamp='0.514'/>
</parse>
<phase_done name='parse' nodes='60' live='55' stamp='0.514'/>
</phase>
<phase name='optimizer' nodes='60' live='55' stamp='0.514'>
<eliminate_allocation type='771'>
<jvms bci='7' method='773'/>
<jvms bci='1' method='772'/>
</eliminate_allocation>
<phase_done name='optimizer' nodes='40' live='38' stamp='0.515'/>
</phase>
<code_cache total_blobs='512' nmethods='40' adapters='200' free_code_cache='250000'/>
<task_done success='1' nmsize='208' count='5000' inlined_bytes='16' stamp='0.516'/>
</task>";

/// C1 task whose parse sits in a `parse_hir` phase nested in `buildIR`.
pub const C1_HIR_TASK: &str = "\
<task compile_id='41' compiler='c1' level='3' method='demo/Hir a (D)D' bytes='14' count='1500' stamp='0.300'>
<phase name='setup' stamp='0.300'>
<phase_done name='setup' stamp='0.300'/>
</phase>
<phase name='buildIR' stamp='0.300'>
<type id='680' name='double'/>
<klass id='770' name='demo/Hir' flags='1'/>
<klass id='771' name='java/lang/Math' flags='17'/>
<method id='772' holder='770' name='a' return='680' arguments='680' flags='1' bytes='14'/>
<phase name='parse_hir' stamp='0.300'>
<parse method='772'>
<bc code='184' bci='1'/>
<method id='773' holder='771' name='abs' return='680' arguments='680' flags='9' bytes='10'/>
<call method='773' instr='invokestatic'/>
<intrinsic id='_dabs' nodes='1'/>
<bc code='184' bci='6'/>
<method id='774' holder='770' name='b' return='680' arguments='680' flags='10' bytes='5'/>
<call method='774' instr='invokestatic'/>
<inline_success reason='accessor'/>
<parse method='774'>
</parse>
<bc code='153' bci='10'/>
<branch target_bci='13' taken='3' not_taken='1497'/>
</parse>
<phase_done name='parse_hir' stamp='0.301'/>
</phase>
<phase_done name='buildIR' stamp='0.301'/>
</phase>
<task_done success='1' nmsize='304' count='1500' stamp='0.302'/>
</task>";

/// `a` inlines `b`; `b`'s call to `c` is decided late and `c` then inlines `d`.
pub const LATE_INLINE_TASK: &str = "\
<task compile_id='30' compiler='c2' level='4' method='demo/Late a ()V' bytes='10' stamp='1.000'>
<phase name='parse' nodes='3' live='3' stamp='1.000'>
<type id='680' name='void'/>
<klass id='770' name='demo/Late' flags='1'/>
<method id='771' holder='770' name='a' return='680' flags='9' bytes='10'/>
<method id='772' holder='770' name='b' return='680' flags='10' bytes='8'/>
<method id='773' holder='770' name='c' return='680' flags='10' bytes='6'/>
<method id='774' holder='770' name='d' return='680' flags='10' bytes='1'/>
<parse method='771' uses='100' stamp='1.000'>
<bc code='184' bci='2'/>
<call method='772' count='100' prof_factor='1' inline='1'/>
<inline_success reason='inline (hot)'/>
<parse method='772' uses='100' stamp='1.001'>
<bc code='184' bci='4'/>
<call method='773' count='100' prof_factor='1' inline='1'/>
<direct_call bci='4'/>
</parse>
</parse>
<phase_done name='parse' nodes='20' live='18' stamp='1.002'/>
</phase>
<late_inline method='773' inline_id='1'>
<jvms bci='4' method='772'/>
<jvms bci='2' method='771'/>
<parse method='773' uses='100' stamp='1.003'>
<bc code='184' bci='1'/>
<call method='774' count='100' prof_factor='1' inline='1'/>
<inline_success reason='inline (hot)'/>
<parse method='774' uses='100' stamp='1.003'>
</parse>
</parse>
</late_inline>
<task_done success='1' nmsize='96' count='100' stamp='1.004'/>
</task>";

/// A complete small log: header, a queued task, one compilation with its nmethod and a
/// disassembly of the result.
pub const SMALL_LOG: &str = "\
<?xml version='1.0' encoding='UTF-8'?>
<hotspot_log version='160 1' process='4242' time_ms='1700000000000'>
<vm_version>
<name>
OpenJDK 64-Bit Server VM
</name>
<release>
21.0.2+13
</release>
</vm_version>
<vm_arguments>
<args>
-XX:+UnlockDiagnosticVMOptions -XX:+LogCompilation
</args>
</vm_arguments>
<tty>
<task_queued compile_id='12' method='demo/Chain a (I)I' bytes='24' count='5000' comment='tiered' stamp='0.500'/>
<writer thread='1234'/>
<nmethod compile_id='12' compiler='c2' level='4' address='0x00007f0a0c4b2010' size='640' insts_offset='352' code_begin='0x00007f0a0c4b2170' code_end='0x00007f0a0c4b2290' stamp='0.516'/>
</tty>
<compilation_log thread='1234'>
<start_compile_thread name='C2 CompilerThread0' thread='1234' process='4242' stamp='0.100'/>
<task compile_id='12' compiler='c2' level='4' method='demo/Chain a (I)I' bytes='24' count='5000' stamp='0.512'>
<phase name='parse' nodes='3' live='3' stamp='0.512'>
<type id='680' name='int'/>
<klass id='770' name='demo/Chain' flags='1'/>
<method id='772' holder='770' name='a' return='680' arguments='680' flags='1' bytes='24'/>
<parse method='772' uses='5000' stamp='0.512'>
<bc code='183' bci='1'/>
<method id='773' holder='770' name='b' return='680' arguments='680' flags='2' bytes='12'/>
<call method='773' count='5000' prof_factor='1' inline='1'/>
<inline_success reason='inline (hot)'/>
<parse method='773' uses='5000' stamp='0.513'>
</parse>
<bc code='153' bci='14'/>
<branch target_bci='20' taken='0' not_taken='512' cnt='512' prob='never'/>
</parse>
</phase>
<task_done success='1' nmsize='208' count='5000' inlined_bytes='12' stamp='0.516'/>
</task>
</compilation_log>
</hotspot_log>
";

/// Disassembly of the compiled `demo.Chain::a`, as printed between log sections.
pub const CHAIN_ASSEMBLY: &str = "\
Compiled method (c2)     516   12             demo.Chain::a (24 bytes)
[Disassembly]
--------------------------------------------------------------------------------
[Constant Pool (empty)]

--------------------------------------------------------------------------------

[Verified Entry Point]
  # {method} {0x00007f0a0c4a2000} 'a' '(I)I' in 'demo/Chain'
  # parm0:    rdx       = int
  #           [sp+0x20]  (sp of caller)
  0x00007f0a0c4b2170:   sub    rsp,0x18
  0x00007f0a0c4b2177:   mov    QWORD PTR [rsp+0x10],rbp
  0x00007f0a0c4b217c:   lea    eax,[rdx+0x1]                ;*iadd {reexecute=0 rethrow=0 return_oop=0}
                                                            ; - demo.Chain::b@3 (line 12)
  0x00007f0a0c4b217f:   add    rsp,0x10
  0x00007f0a0c4b2183:   pop    rbp
  0x00007f0a0c4b2184:   ret
";
